use solana_sdk::signature::Keypair;
use crate::errors::{BotError, BotResult};

/// Decodes a signing key given either as a base58 secret key or as the JSON
/// byte array written by `solana-keygen`.
pub fn load_keypair(secret: &str) -> BotResult<Keypair> {
    let secret = secret.trim();
    let secret_bytes: Vec<u8> = if secret.starts_with('[') {
        serde_json::from_str(secret)
            .map_err(|e| BotError::Configuration(format!("private key JSON: {}", e)))?
    } else {
        bs58::decode(secret)
            .into_vec()
            .map_err(|e| BotError::Configuration(format!("private key base58: {}", e)))?
    };

    Keypair::from_bytes(&secret_bytes)
        .map_err(|e| BotError::Configuration(format!("private key bytes: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;

    #[test]
    fn test_load_base58_keypair() {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();
        let loaded = load_keypair(&format!("  {}\n", encoded)).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_load_json_keypair() {
        let keypair = Keypair::new();
        let json = serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap();
        assert_eq!(load_keypair(&json).unwrap().pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_bad_keys_are_configuration_errors() {
        assert!(matches!(load_keypair("0OIl"), Err(BotError::Configuration(_))));
        assert!(matches!(load_keypair("[1,2,3]"), Err(BotError::Configuration(_))));
    }
}
