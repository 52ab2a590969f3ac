//! # Azure Integration
//!
//! OAuth2 client-credential tokens ([`token`]), the [`KeyVaultApi`] seam the
//! jobs program against ([`api`]), its reqwest implementation ([`client`]),
//! the serde wire models ([`models`]), and an in-memory stand-in ([`mock`]).

pub mod api;
pub mod client;
pub mod mock;
pub mod models;
pub mod token;

pub use api::{ClientFactory, KeyVaultApi};
pub use client::{AzureClient, AzureClientFactory};
pub use mock::{MockCall, MockClientFactory, MockKeyVault, MockOperation};
pub use models::{
    AccessPolicy, CertificateIdentifier, CertificateOperation, CertificateRecord,
    CertificateSummary, DeletedCertificate, Permissions, VaultDescriptor,
};
pub use token::{Audience, BearerToken, TokenProvider};
