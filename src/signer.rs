use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{Parameters, SecretsProvider};

type HmacSha256 = Hmac<Sha256>;

/// Signs request parameters with the secret of a borrowed credential provider.
#[derive(Debug, Clone)]
pub struct Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    secrets: &'a TSecretsProvider,
}

impl<'a, TSecretsProvider> Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    pub fn new(secrets: &'a TSecretsProvider) -> Self {
        Signer { secrets }
    }

    pub fn generate_signature(&self, endpoint: &str, params: &Parameters) -> String {
        sign(self.secrets.get_app_secret(), endpoint, params)
    }
}

/// Compute the request signature.
///
/// The signed message is `endpoint` followed by `|key=value` for every
/// parameter in ascending key order, keyed with `secret`. The result is the
/// lowercase hex HMAC-SHA256 digest.
pub fn sign(secret: &str, endpoint: &str, params: &Parameters) -> String {
    let mut message = String::from(endpoint);
    for (key, value) in params {
        message.push('|');
        message.push_str(key);
        message.push('=');
        message.push_str(value);
    }

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
