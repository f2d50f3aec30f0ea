use keyring::Entry;

use crate::error::AppError;

const SERVICE: &str = "omada";

fn entry(target: &str) -> Result<Entry, AppError> {
    Entry::new(SERVICE, target).map_err(|e| AppError::Keychain(e.to_string()))
}

pub fn get_password(target: &str) -> Result<Option<String>, AppError> {
    let entry = entry(target)?;
    match entry.get_password() {
        Ok(val) => Ok(Some(val)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(AppError::Keychain(e.to_string())),
    }
}

pub fn store_password(target: &str, password: &str) -> Result<(), AppError> {
    let entry = entry(target)?;
    entry
        .set_password(password)
        .map_err(|e| AppError::Keychain(e.to_string()))
}

pub fn delete_password(target: &str) -> Result<(), AppError> {
    let entry = entry(target)?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(AppError::Keychain(e.to_string())),
    }
}
