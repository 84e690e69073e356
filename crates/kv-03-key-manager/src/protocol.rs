//! # Remote Signing Protocol
//!
//! Route layout and JSON bodies spoken between a remote wallet and a
//! signing daemon. One flat schema per signing type; every fixed-width
//! byte field is lower-case hex without a `0x` prefix.

use serde::{Deserialize, Serialize};
use shared_types::{
    AttestationData, BeaconBlockHeader, BlsPublicKey, BlsSignature, Checkpoint, Domain, Root,
    Slot,
};

/// Route paths of a signing daemon.
///
/// Both ends of the protocol take this by value, so a deployment that
/// mounts the API elsewhere changes it in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SigningRoutes {
    /// Mount point, e.g. `/v1/ethereum`.
    pub base_path: String,
    pub aggregation: String,
    pub proposal: String,
    pub attestation: String,
}

impl Default for SigningRoutes {
    fn default() -> Self {
        Self {
            base_path: "/v1/ethereum".to_string(),
            aggregation: "accounts/sign/aggregation".to_string(),
            proposal: "accounts/sign/proposal".to_string(),
            attestation: "accounts/sign/attestation".to_string(),
        }
    }
}

impl SigningRoutes {
    /// `route` relative to the daemon root: `{base_path}/{route}`.
    pub fn path(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.base_path.trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }

    /// Absolute URL of `route` on the daemon at `location`.
    pub fn url(&self, location: &str, route: &str) -> String {
        format!("{}{}", location.trim_end_matches('/'), self.path(route))
    }

    /// A usable base path starts with `/` and is not just `/`.
    pub fn is_valid(&self) -> bool {
        self.base_path.starts_with('/')
            && self.base_path.trim_end_matches('/').len() > 1
            && ![&self.aggregation, &self.proposal, &self.attestation]
                .iter()
                .any(|r| r.trim_matches('/').is_empty())
    }
}

/// `deserialize_with` wrappers that name the wire field on a bad value.
mod wire {
    use serde::Deserializer;
    use shared_types::{deserialize_field, BlsPublicKey, Domain, Root};

    macro_rules! named_field {
        ($($name:ident: $ty:ty => $field:literal),* $(,)?) => {
            $(
                pub fn $name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<$ty, D::Error> {
                    deserialize_field($field, deserializer)
                }
            )*
        };
    }

    named_field! {
        pubkey: BlsPublicKey => "pubkey",
        domain: Domain => "domain",
        data_to_sign: Root => "dataToSign",
        parent_root: Root => "parentRoot",
        state_root: Root => "stateRoot",
        body_root: Root => "bodyRoot",
        beacon_block_root: Root => "beaconBlockRoot",
        source_root: Root => "sourceRoot",
        target_root: Root => "targetRoot",
    }
}

/// Body of `POST {base}/accounts/sign/aggregation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignAggregationRequest {
    #[serde(deserialize_with = "wire::pubkey")]
    pub pubkey: BlsPublicKey,
    #[serde(deserialize_with = "wire::domain")]
    pub domain: Domain,
    #[serde(deserialize_with = "wire::data_to_sign")]
    pub data_to_sign: Root,
}

/// Body of `POST {base}/accounts/sign/proposal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignProposalRequest {
    #[serde(deserialize_with = "wire::pubkey")]
    pub pubkey: BlsPublicKey,
    #[serde(deserialize_with = "wire::domain")]
    pub domain: Domain,
    pub slot: Slot,
    pub proposer_index: u64,
    #[serde(deserialize_with = "wire::parent_root")]
    pub parent_root: Root,
    #[serde(deserialize_with = "wire::state_root")]
    pub state_root: Root,
    #[serde(deserialize_with = "wire::body_root")]
    pub body_root: Root,
}

impl SignProposalRequest {
    pub fn new(pubkey: BlsPublicKey, domain: Domain, header: &BeaconBlockHeader) -> Self {
        Self {
            pubkey,
            domain,
            slot: header.slot,
            proposer_index: header.proposer_index,
            parent_root: header.parent_root,
            state_root: header.state_root,
            body_root: header.body_root,
        }
    }

    pub fn header(&self) -> BeaconBlockHeader {
        BeaconBlockHeader {
            slot: self.slot,
            proposer_index: self.proposer_index,
            parent_root: self.parent_root,
            state_root: self.state_root,
            body_root: self.body_root,
        }
    }
}

/// Body of `POST {base}/accounts/sign/attestation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignAttestationRequest {
    #[serde(deserialize_with = "wire::pubkey")]
    pub pubkey: BlsPublicKey,
    #[serde(deserialize_with = "wire::domain")]
    pub domain: Domain,
    pub slot: Slot,
    pub committee_index: u64,
    #[serde(deserialize_with = "wire::beacon_block_root")]
    pub beacon_block_root: Root,
    pub source_epoch: u64,
    #[serde(deserialize_with = "wire::source_root")]
    pub source_root: Root,
    pub target_epoch: u64,
    #[serde(deserialize_with = "wire::target_root")]
    pub target_root: Root,
}

impl SignAttestationRequest {
    pub fn new(pubkey: BlsPublicKey, domain: Domain, data: &AttestationData) -> Self {
        Self {
            pubkey,
            domain,
            slot: data.slot,
            committee_index: data.committee_index,
            beacon_block_root: data.beacon_block_root,
            source_epoch: data.source.epoch,
            source_root: data.source.root,
            target_epoch: data.target.epoch,
            target_root: data.target.root,
        }
    }

    pub fn data(&self) -> AttestationData {
        AttestationData {
            slot: self.slot,
            committee_index: self.committee_index,
            beacon_block_root: self.beacon_block_root,
            source: Checkpoint {
                epoch: self.source_epoch,
                root: self.source_root,
            },
            target: Checkpoint {
                epoch: self.target_epoch,
                root: self.target_root,
            },
        }
    }
}

/// Successful signing answer: `{"data": {"signature": "<hex>"}}`.
///
/// The signature stays a string here so the client can report a bad
/// value as a hex error naming the `signature` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignResponse {
    pub data: SignatureData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureData {
    pub signature: String,
}

impl SignResponse {
    pub fn new(signature: &BlsSignature) -> Self {
        Self {
            data: SignatureData {
                signature: signature.to_hex(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_routes() {
        let routes = SigningRoutes::default();
        assert_eq!(
            routes.path(&routes.attestation),
            "/v1/ethereum/accounts/sign/attestation"
        );
        assert_eq!(
            routes.url("http://127.0.0.1:8200/", &routes.proposal),
            "http://127.0.0.1:8200/v1/ethereum/accounts/sign/proposal"
        );
        assert!(routes.is_valid());
    }

    #[test]
    fn test_invalid_base_paths() {
        for base in ["", "/", "v1/ethereum"] {
            let routes = SigningRoutes {
                base_path: base.to_string(),
                ..Default::default()
            };
            assert!(!routes.is_valid(), "{:?} accepted", base);
        }
    }

    #[test]
    fn test_attestation_request_wire_shape() {
        let data = AttestationData {
            slot: 97,
            committee_index: 2,
            beacon_block_root: Root([0x01; 32]),
            source: Checkpoint {
                epoch: 2,
                root: Root([0x02; 32]),
            },
            target: Checkpoint {
                epoch: 3,
                root: Root([0x03; 32]),
            },
        };
        let request = SignAttestationRequest::new(BlsPublicKey([0xab; 48]), Domain([0x0c; 32]), &data);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["pubkey"], "ab".repeat(48));
        assert_eq!(json["domain"], "0c".repeat(32));
        assert_eq!(json["committeeIndex"], 2);
        assert_eq!(json["sourceEpoch"], 2);
        assert_eq!(json["targetRoot"], "03".repeat(32));
        assert_eq!(request.data(), data);
    }

    #[test]
    fn test_proposal_request_round_trip() {
        let header = BeaconBlockHeader {
            slot: 12,
            proposer_index: 7,
            parent_root: Root([1; 32]),
            state_root: Root([2; 32]),
            body_root: Root([3; 32]),
        };
        let request = SignProposalRequest::new(BlsPublicKey([1; 48]), Domain::default(), &header);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"proposerIndex\":7"));

        let decoded: SignProposalRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.header(), header);
    }

    #[test]
    fn test_bad_root_names_wire_field() {
        let header = BeaconBlockHeader::default();
        let mut body = serde_json::to_value(SignProposalRequest::new(
            BlsPublicKey([1; 48]),
            Domain::default(),
            &header,
        ))
        .unwrap();
        body["parentRoot"] = "zz".repeat(32).into();

        let err = serde_json::from_value::<SignProposalRequest>(body).unwrap_err();
        assert!(err.to_string().contains("'parentRoot'"), "{}", err);
    }

    #[test]
    fn test_aggregation_rejects_prefixed_hex() {
        let body = format!(
            r#"{{"pubkey":"0x{}","domain":"{}","dataToSign":"{}"}}"#,
            "aa".repeat(48),
            "00".repeat(32),
            "00".repeat(32)
        );
        assert!(serde_json::from_str::<SignAggregationRequest>(&body).is_err());
    }
}
