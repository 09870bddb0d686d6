use crate::error::CheckError;
use crate::mail::init_email_config;
use std::path::Path;

/// Writes a fresh `mail.properties` template and tells the user where.
pub fn execute(config_dir: &Path) -> Result<(), CheckError> {
    let path = init_email_config(config_dir)?;
    println!("Please, modify config file located here : {}", path.display());
    Ok(())
}
