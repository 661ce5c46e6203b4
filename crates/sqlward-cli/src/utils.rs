use std::{
    fmt::Display,
    io::Read,
    sync::{LazyLock, RwLock},
};

use nu_ansi_term::Color;

use crate::error::{CliError, Result};

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let color = COLOR.read().unwrap();
        if *color {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

/// Returns the request argument, reading stdin when it is absent or `-`.
pub fn read_request(arg: Option<String>) -> Result<String> {
    match arg.as_deref() {
        Some(text) if text != "-" => Ok(text.to_string()),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| CliError::Io {
                    action: "reading request from stdin".to_string(),
                    source: err,
                })?;
            Ok(buffer)
        }
    }
}
