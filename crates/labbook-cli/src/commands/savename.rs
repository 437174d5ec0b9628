use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use labbook_core::load_params_file;
use labbook_exp::savename;

use super::NamingArgs;

#[derive(Args, Debug)]
pub struct SavenameArgs {
    /// Parameter file (JSON, or YAML by extension).
    #[arg(long)]
    pub params: PathBuf,
    #[command(flatten)]
    pub naming: NamingArgs,
}

pub fn run(args: &SavenameArgs) -> Result<(), Box<dyn Error>> {
    let params = load_params_file(&args.params)?;
    let policy = args.naming.resolve()?;
    println!("{}", savename(&params, &policy)?);
    Ok(())
}
