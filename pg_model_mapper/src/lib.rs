//! Connects to a PostgreSQL database and prints web2py model code representing its tables
//!
//! Reads the ANSI `information_schema` views (plus the PostgreSQL comment
//! catalog), runs every table and column through an ordered rule list, maps
//! catalog types, constraints and defaults onto web2py `Field(...)`
//! specifications and renders one `db.define_table(...)` block per included
//! table. Unsupported catalog features fail the whole run; nothing is guessed.

pub mod connection;

pub mod emit;

pub mod error;

pub mod filter;

pub mod generate;

pub mod mapper;

pub mod model;

pub mod resolve;

pub mod schema_queries;

use pg_model_mapper_core::SqlError;
use postgres::{Client, NoTls};
use structopt::StructOpt;

pub const HELP: &str = "USAGE: pg_model_mapper db host port user password

Call with PostgreSQL database connection parameters,
the web2py model is printed on standard output.

EXAMPLE: pg_model_mapper mydb localhost 5432 reingart saraza
";

#[derive(Debug, StructOpt)]
#[structopt(name = "pg_model_mapper", about = "Generate web2py model code from a live PostgreSQL database")]
pub struct Opt {
	/// Name of the database to generate a model for
	pub database: String,
	/// Host the database runs on
	pub host: String,
	/// Port the database listens on
	pub port: u16,
	/// User to connect as
	pub user: String,
	/// Password for that user
	pub password: String,
}

impl Opt {
	pub fn get_client(&self) -> Result<Client, SqlError> {
		postgres::Config::new()
			.dbname(&self.database)
			.host(&self.host)
			.port(self.port)
			.user(&self.user)
			.password(&self.password)
			.connect(NoTls)
	}
}
