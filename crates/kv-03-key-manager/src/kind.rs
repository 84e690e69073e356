//! Key manager selection.

use async_trait::async_trait;
use shared_types::{AttestationData, BeaconBlockHeader, BlsPublicKey, BlsSignature, Domain, Root};

use crate::adapters::{LocalKeyManager, RemoteHttpWallet, RemoteWalletOptions};
use crate::error::KeyManagerResult;
use crate::ports::KeyManager;
use crate::protocol::SigningRoutes;

/// The two key manager realizations, chosen at construction.
#[derive(Debug)]
pub enum KeyManagerKind {
    Local(LocalKeyManager),
    RemoteHttp(RemoteHttpWallet),
}

impl KeyManagerKind {
    pub fn local(manager: LocalKeyManager) -> Self {
        KeyManagerKind::Local(manager)
    }

    /// Remote wallet from options. Fails on missing or malformed options
    /// without touching the network.
    pub fn from_remote_options(
        options: &RemoteWalletOptions,
        routes: SigningRoutes,
    ) -> KeyManagerResult<Self> {
        RemoteHttpWallet::new(options, routes).map(KeyManagerKind::RemoteHttp)
    }

    fn inner(&self) -> &dyn KeyManager {
        match self {
            KeyManagerKind::Local(manager) => manager,
            KeyManagerKind::RemoteHttp(wallet) => wallet,
        }
    }
}

#[async_trait]
impl KeyManager for KeyManagerKind {
    async fn sign(&self, public_key: &BlsPublicKey, root: &Root) -> KeyManagerResult<BlsSignature> {
        self.inner().sign(public_key, root).await
    }

    async fn sign_generic(
        &self,
        public_key: &BlsPublicKey,
        root: &Root,
        domain: &Domain,
    ) -> KeyManagerResult<BlsSignature> {
        self.inner().sign_generic(public_key, root, domain).await
    }

    async fn sign_proposal(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        header: &BeaconBlockHeader,
    ) -> KeyManagerResult<BlsSignature> {
        self.inner().sign_proposal(public_key, domain, header).await
    }

    async fn sign_attestation(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        data: &AttestationData,
    ) -> KeyManagerResult<BlsSignature> {
        self.inner().sign_attestation(public_key, domain, data).await
    }

    async fn fetch_validating_keys(&self) -> KeyManagerResult<Vec<BlsPublicKey>> {
        self.inner().fetch_validating_keys().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BlsKeyPair;
    use crate::error::KeyManagerError;

    #[tokio::test]
    async fn test_local_variant_delegates() {
        let pair = BlsKeyPair::generate().unwrap();
        let public_key = pair.public_key();
        let manager = KeyManagerKind::local(LocalKeyManager::with_key(pair));

        assert!(matches!(manager, KeyManagerKind::Local(_)));
        assert_eq!(manager.fetch_validating_keys().await.unwrap(), vec![public_key]);
        assert!(manager
            .sign_generic(&public_key, &Root::default(), &Domain::default())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_remote_variant_refuses_unprotected_sign() {
        let options = RemoteWalletOptions {
            location: "http://127.0.0.1:1".to_string(),
            access_token: "t".to_string(),
            pub_key: "ab".repeat(48),
            request_timeout_secs: None,
        };
        let manager = KeyManagerKind::from_remote_options(&options, SigningRoutes::default()).unwrap();

        assert!(matches!(manager, KeyManagerKind::RemoteHttp(_)));
        let result = manager.sign(&BlsPublicKey([0xab; 48]), &Root::default()).await;
        assert!(matches!(result, Err(KeyManagerError::UnprotectedSigningUnsupported)));
    }

    #[test]
    fn test_remote_variant_requires_options() {
        let result =
            KeyManagerKind::from_remote_options(&RemoteWalletOptions::default(), SigningRoutes::default());
        assert!(matches!(result, Err(KeyManagerError::Validation(_))));
    }
}
