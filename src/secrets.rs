use crate::{Error, Result};

/// Supplies the application id/secret pair used for signing.
pub trait SecretsProvider {
    fn get_app_pair<'a>(&'a self) -> (&'a str, &'a str);

    fn get_app_secret<'a>(&'a self) -> &'a str {
        self.get_app_pair().1
    }
}

/// Registered application credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    id: String,
    secret: String,
}

impl App {
    /// Both values must be non-empty.
    pub fn new<TId, TSecret>(id: TId, secret: TSecret) -> Result<Self>
    where
        TId: Into<String>,
        TSecret: Into<String>,
    {
        let id = id.into();
        let secret = secret.into();
        if id.is_empty() {
            return Err(Error::Config(
                "the \"client_id\" must be a non-empty string".to_string(),
            ));
        }
        if secret.is_empty() {
            return Err(Error::Config(
                "the \"client_secret\" must be a non-empty string".to_string(),
            ));
        }
        Ok(App { id, secret })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl SecretsProvider for App {
    fn get_app_pair<'a>(&'a self) -> (&'a str, &'a str) {
        (&self.id, &self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn app_keeps_pair() {
        let app = App::new("<CLIENT_ID>", "<CLIENT_SECRET>").unwrap();
        assert_eq!(app.get_app_pair(), ("<CLIENT_ID>", "<CLIENT_SECRET>"));
        assert_eq!(app.get_app_secret(), "<CLIENT_SECRET>");
    }

    #[test]
    fn app_rejects_empty_values() {
        assert_eq!(App::new("", "s").unwrap_err().kind(), ErrorKind::Config);
        assert_eq!(App::new("i", "").unwrap_err().kind(), ErrorKind::Config);
    }
}
