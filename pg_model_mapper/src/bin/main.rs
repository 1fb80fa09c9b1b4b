use pg_model_mapper::{
	connection::CatalogClient,
	emit::ToModelCode,
	error::Result,
	filter,
	generate,
	Opt,
	HELP,
};
use structopt::StructOpt;

fn main() -> Result<()> {
	env_logger::init();

	// too few arguments is a request for the banner, not an error
	if std::env::args().count() < 6 {
		print!("{}", HELP);
		return Ok(());
	}
	let opt = Opt::from_args();

	let client = opt.get_client()?;
	let mut client = CatalogClient::new(client)?;
	let rules = filter::default_rules()?;

	let full_model = generate::dump_db(&mut client, &rules, &opt)?;
	print!("{}", full_model.as_model_string());
	Ok(())
}
