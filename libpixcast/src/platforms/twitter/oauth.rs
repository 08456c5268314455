//! OAuth 1.0a request signing (HMAC-SHA1)
//!
//! Twitter's user-context authentication for both the v1.1 media endpoint and
//! the v2 tweets endpoint. Only query and form-encoded parameters take part
//! in the signature; multipart and JSON bodies do not, so callers pass an
//! empty parameter list for those.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha1::Sha1;
use urlencoding::encode;

type HmacSha1 = Hmac<Sha1>;

/// The four user-context secrets
pub struct TwitterCredentials {
    pub consumer_key: SecretString,
    pub consumer_secret: SecretString,
    pub access_token: SecretString,
    pub access_token_secret: SecretString,
}

impl TwitterCredentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: SecretString::from(consumer_key.into()),
            consumer_secret: SecretString::from(consumer_secret.into()),
            access_token: SecretString::from(access_token.into()),
            access_token_secret: SecretString::from(access_token_secret.into()),
        }
    }
}

impl std::fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("consumer_key", &"***")
            .field("consumer_secret", &"***")
            .field("access_token", &"***")
            .field("access_token_secret", &"***")
            .finish()
    }
}

#[derive(Debug)]
pub struct OAuth1Signer {
    credentials: TwitterCredentials,
}

impl OAuth1Signer {
    pub fn new(credentials: TwitterCredentials) -> Self {
        Self { credentials }
    }

    /// Build the `Authorization` header value for a request
    ///
    /// `params` are the query or form parameters of the request, unencoded.
    pub fn authorization_header(&self, method: &str, url: &str, params: &[(&str, &str)]) -> String {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp();
        self.authorization_header_with(method, url, params, &nonce, timestamp)
    }

    pub(crate) fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> String {
        let timestamp = timestamp.to_string();
        let mut oauth_params: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", self.credentials.consumer_key.expose_secret()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.credentials.access_token.expose_secret()),
            ("oauth_version", "1.0"),
        ];

        let signature = self.signature(method, url, &oauth_params, params);
        oauth_params.push(("oauth_signature", signature.as_str()));

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();

        format!("OAuth {}", fields.join(", "))
    }

    fn signature(
        &self,
        method: &str,
        url: &str,
        oauth_params: &[(&str, &str)],
        params: &[(&str, &str)],
    ) -> String {
        let base = signature_base_string(method, url, oauth_params, params);
        let key = format!(
            "{}&{}",
            encode(self.credentials.consumer_secret.expose_secret()),
            encode(self.credentials.access_token_secret.expose_secret())
        );

        let mut mac =
            HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC-SHA1 accepts any key length");
        mac.update(base.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }
}

/// `METHOD&enc(url)&enc(sorted, encoded params)`
fn signature_base_string(
    method: &str,
    url: &str,
    oauth_params: &[(&str, &str)],
    params: &[(&str, &str)],
) -> String {
    let mut pairs: Vec<(String, String)> = oauth_params
        .iter()
        .chain(params.iter())
        .map(|(k, v)| (encode(k).into_owned(), encode(v).into_owned()))
        .collect();
    pairs.sort();

    let param_string = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&param_string)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from Twitter's "Creating a signature" documentation.
    fn reference_signer() -> OAuth1Signer {
        OAuth1Signer::new(TwitterCredentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        ))
    }

    const REFERENCE_URL: &str = "https://api.twitter.com/1.1/statuses/update.json";
    const REFERENCE_NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
    const REFERENCE_TIMESTAMP: i64 = 1318622958;
    const REFERENCE_PARAMS: [(&str, &str); 2] = [
        ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
        ("include_entities", "true"),
    ];

    #[test]
    fn test_signature_matches_reference() {
        let header = reference_signer().authorization_header_with(
            "post",
            REFERENCE_URL,
            &REFERENCE_PARAMS,
            REFERENCE_NONCE,
            REFERENCE_TIMESTAMP,
        );

        assert!(
            header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""),
            "unexpected header: {}",
            header
        );
    }

    #[test]
    fn test_base_string_encoding_and_order() {
        let oauth_params = [("oauth_nonce", "n"), ("oauth_consumer_key", "k")];
        let base = signature_base_string(
            "POST",
            "https://upload.twitter.com/1.1/media/upload.json",
            &oauth_params,
            &[("a b", "c+d")],
        );

        assert_eq!(
            base,
            "POST&https%3A%2F%2Fupload.twitter.com%2F1.1%2Fmedia%2Fupload.json\
             &a%2520b%3Dc%252Bd%26oauth_consumer_key%3Dk%26oauth_nonce%3Dn"
        );
    }

    #[test]
    fn test_header_shape() {
        let header = reference_signer().authorization_header(
            "POST",
            "https://api.twitter.com/2/tweets",
            &[],
        );

        assert!(header.starts_with("OAuth "));
        for field in [
            "oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\"",
            "oauth_signature_method=\"HMAC-SHA1\"",
            "oauth_version=\"1.0\"",
            "oauth_nonce=",
            "oauth_timestamp=",
            "oauth_token=",
            "oauth_signature=",
        ] {
            assert!(header.contains(field), "missing {} in {}", field, header);
        }
    }

    #[test]
    fn test_nonce_differs_between_requests() {
        let signer = reference_signer();
        let first = signer.authorization_header("POST", REFERENCE_URL, &[]);
        let second = signer.authorization_header("POST", REFERENCE_URL, &[]);
        assert_ne!(first, second);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", reference_signer());
        assert!(!debug.contains("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw"));
        assert!(!debug.contains("xvz1evFS4wEEPTGEFPHBog"));
        assert!(!debug.contains("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"));
    }

    #[test]
    fn test_credentials_debug_lists_every_field() {
        let credentials = TwitterCredentials::new("a", "b", "c", "d");
        assert_eq!(
            format!("{:?}", credentials),
            "TwitterCredentials { consumer_key: \"***\", consumer_secret: \"***\", \
             access_token: \"***\", access_token_secret: \"***\" }"
        );
    }
}
