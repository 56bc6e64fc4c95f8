//! Key validation and encryption health checks.
//!
//! Administrative diagnostics over the whole key population, not part of
//! the request-serving path. Scans iterate every key record, so they belong
//! in maintenance jobs and admin endpoints, not request handlers.
//!
//! Per-principal failures during a bulk scan are recorded as invalid entries
//! so one bad record never aborts the rest of the scan; a failure to list
//! the records at all still propagates.

use chrono::{DateTime, Utc};
use pawvault_crypto::KeyPairPem;
use pawvault_fields::{DataCategory, FieldEncryptionService};
use pawvault_keyring::{KeyInfo, KeyLifecycleManager};
use pawvault_keystore::{KeyStore, StoreResult};
use pawvault_types::PrincipalId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of a single-principal encryption probe.
#[derive(Debug, Clone, Serialize)]
pub struct EncryptionTestReport {
    /// Every probe field round-tripped byte-for-byte.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// The probe data, present on success.
    pub details: Option<EncryptionTestDetails>,
}

/// The probe mappings from a successful encryption test.
#[derive(Debug, Clone, Serialize)]
pub struct EncryptionTestDetails {
    pub original: BTreeMap<String, String>,
    pub encrypted: BTreeMap<String, String>,
    pub decrypted: BTreeMap<String, String>,
}

/// Validation outcome for one principal within a bulk scan.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalValidation {
    pub principal_id: PrincipalId,
    pub is_valid: bool,
    pub message: String,
}

/// Aggregate outcome of a bulk key validation scan.
#[derive(Debug, Clone, Serialize)]
pub struct KeyValidationSummary {
    pub total_principals: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub results: Vec<PrincipalValidation>,
}

/// Overall health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

/// System-wide encryption health report.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub timestamp: DateTime<Utc>,
    pub overall_health: HealthStatus,
    pub summary: String,
    pub details: KeyValidationSummary,
}

/// Outcome of creating and validating throwaway keys.
#[derive(Debug)]
pub struct TestKeyReport {
    pub success: bool,
    pub message: String,
    /// The generated pair, present on success so the caller can exercise it.
    pub keys: Option<KeyPairPem>,
}

/// Outcome of removing throwaway keys.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub success: bool,
    pub message: String,
}

/// Outcome of a full generate-validate-cleanup smoke test.
#[derive(Debug, Clone, Serialize)]
pub struct SmokeTestReport {
    /// The throwaway principal the test ran under.
    pub principal_id: PrincipalId,
    pub success: bool,
    pub message: String,
}

/// Key status plus probe outcome plus what to do about it.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalKeyReport {
    pub principal_id: PrincipalId,
    pub key_info: KeyInfo,
    pub probe: EncryptionTestReport,
    pub recommendations: Vec<String>,
}

/// Runs diagnostics across the key population.
pub struct HealthChecker {
    keyring: Arc<KeyLifecycleManager>,
    fields: FieldEncryptionService,
    store: Arc<dyn KeyStore>,
}

impl HealthChecker {
    /// Creates a checker over the given keyring and store.
    pub fn new(keyring: Arc<KeyLifecycleManager>, store: Arc<dyn KeyStore>) -> Self {
        let fields = FieldEncryptionService::new(Arc::clone(&keyring));
        Self {
            keyring,
            fields,
            store,
        }
    }

    /// Encrypts and decrypts a fixed multi-field probe for one principal and
    /// verifies every field round-trips byte-for-byte. Never errors.
    pub async fn test_encryption(&self, principal: &PrincipalId) -> EncryptionTestReport {
        match self.keyring.has_valid_keys(principal).await {
            Ok(true) => {}
            Ok(false) => {
                return EncryptionTestReport {
                    success: false,
                    message: format!("principal {principal} does not have valid encryption keys"),
                    details: None,
                };
            }
            Err(e) => {
                return EncryptionTestReport {
                    success: false,
                    message: format!("key lookup failed: {e}"),
                    details: None,
                };
            }
        }

        let original = probe_fields();

        let encrypted = match self
            .fields
            .batch_encrypt(DataCategory::PersonalInfo, &original, principal)
            .await
        {
            Ok(encrypted) => encrypted,
            Err(e) => {
                return EncryptionTestReport {
                    success: false,
                    message: format!("probe encryption failed: {e}"),
                    details: None,
                };
            }
        };

        let decrypted = match self
            .fields
            .batch_decrypt(DataCategory::PersonalInfo, &encrypted, principal)
            .await
        {
            Ok(decrypted) => decrypted,
            Err(e) => {
                return EncryptionTestReport {
                    success: false,
                    message: format!("probe decryption failed: {e}"),
                    details: None,
                };
            }
        };

        if decrypted != original {
            return EncryptionTestReport {
                success: false,
                message: "integrity check failed: decrypted probe differs from original"
                    .to_string(),
                details: None,
            };
        }

        EncryptionTestReport {
            success: true,
            message: "encryption round trip passed".to_string(),
            details: Some(EncryptionTestDetails {
                original,
                encrypted,
                decrypted,
            }),
        }
    }

    /// Validates every key record in the store.
    ///
    /// Per-principal failures become invalid entries; the scan continues.
    ///
    /// # Errors
    /// Propagates a store failure from listing the records themselves.
    pub async fn validate_all_keys(&self) -> StoreResult<KeyValidationSummary> {
        let records = self.store.list_all().await?;

        let mut results = Vec::with_capacity(records.len());
        let mut valid_count = 0;
        let mut invalid_count = 0;

        for record in &records {
            let is_valid = self.keyring.validate_keys(&record.principal_id).await;
            if is_valid {
                valid_count += 1;
            } else {
                invalid_count += 1;
            }
            results.push(PrincipalValidation {
                principal_id: record.principal_id.clone(),
                is_valid,
                message: if is_valid {
                    "keys are valid".to_string()
                } else {
                    "keys failed their round trip".to_string()
                },
            });
        }

        info!(
            total = records.len(),
            valid = valid_count,
            invalid = invalid_count,
            "key validation scan complete"
        );

        Ok(KeyValidationSummary {
            total_principals: records.len(),
            valid_count,
            invalid_count,
            results,
        })
    }

    /// Classifies overall encryption health.
    ///
    /// `critical` if any pair fails validation, `warning` if no principals
    /// exist yet, `healthy` otherwise.
    pub async fn perform_health_check(&self) -> StoreResult<HealthReport> {
        let details = self.validate_all_keys().await?;

        let (overall_health, summary) = if details.invalid_count > 0 {
            (
                HealthStatus::Critical,
                format!(
                    "{} principal(s) have invalid encryption keys",
                    details.invalid_count
                ),
            )
        } else if details.total_principals == 0 {
            (
                HealthStatus::Warning,
                "no encryption keys found in the store".to_string(),
            )
        } else {
            (
                HealthStatus::Healthy,
                "all encryption keys are working correctly".to_string(),
            )
        };

        if overall_health == HealthStatus::Critical {
            warn!(invalid = details.invalid_count, "encryption health is critical");
        }

        Ok(HealthReport {
            timestamp: Utc::now(),
            overall_health,
            summary,
            details,
        })
    }

    /// Creates keys for a throwaway principal and validates them end to end.
    ///
    /// If validation fails the keys are removed again, so a failed run never
    /// leaves a half-working record behind.
    pub async fn generate_test_keys(
        &self,
        principal: &PrincipalId,
        strength: u32,
    ) -> TestKeyReport {
        match self.keyring.has_valid_keys(principal).await {
            Ok(false) => {}
            Ok(true) => {
                return TestKeyReport {
                    success: false,
                    message: format!("keys already exist for principal: {principal}"),
                    keys: None,
                };
            }
            Err(e) => {
                return TestKeyReport {
                    success: false,
                    message: format!("key lookup failed: {e}"),
                    keys: None,
                };
            }
        }

        let keys = match self
            .keyring
            .initialize_keys_with_strength(principal, strength)
            .await
        {
            Ok(keys) => keys,
            Err(e) => {
                return TestKeyReport {
                    success: false,
                    message: format!("failed to generate test keys: {e}"),
                    keys: None,
                };
            }
        };

        let probe = self.test_encryption(principal).await;
        if !probe.success {
            // Do not leave an unusable pair behind.
            if let Err(e) = self.keyring.remove_keys(principal).await {
                warn!(principal = %principal, error = %e, "failed to remove keys after probe failure");
            }
            return TestKeyReport {
                success: false,
                message: format!("generation succeeded but validation failed: {}", probe.message),
                keys: None,
            };
        }

        TestKeyReport {
            success: true,
            message: "test keys generated and validated".to_string(),
            keys: Some(keys),
        }
    }

    /// Removes a throwaway principal's keys.
    pub async fn cleanup_test_keys(&self, principal: &PrincipalId) -> CleanupReport {
        match self.keyring.has_valid_keys(principal).await {
            Ok(true) => {}
            Ok(false) => {
                return CleanupReport {
                    success: false,
                    message: format!("no keys found for principal: {principal}"),
                };
            }
            Err(e) => {
                return CleanupReport {
                    success: false,
                    message: format!("key lookup failed: {e}"),
                };
            }
        }

        match self.keyring.remove_keys(principal).await {
            Ok(()) => CleanupReport {
                success: true,
                message: format!("test keys cleaned up for principal: {principal}"),
            },
            Err(e) => CleanupReport {
                success: false,
                message: format!("failed to clean up test keys: {e}"),
            },
        }
    }

    /// Exercises the whole pipeline (generate, validate, remove) under a
    /// fresh random principal, leaving production data untouched.
    pub async fn run_smoke_test(&self, strength: u32) -> SmokeTestReport {
        let principal = PrincipalId::new(format!("smoke-{}", Uuid::new_v4()));

        let generated = self.generate_test_keys(&principal, strength).await;
        if !generated.success {
            return SmokeTestReport {
                principal_id: principal,
                success: false,
                message: generated.message,
            };
        }

        let cleanup = self.cleanup_test_keys(&principal).await;
        SmokeTestReport {
            success: cleanup.success,
            message: if cleanup.success {
                "smoke test passed".to_string()
            } else {
                format!("smoke test keys validated but cleanup failed: {}", cleanup.message)
            },
            principal_id: principal,
        }
    }

    /// Full per-principal report: status, probe outcome, and what to do next.
    pub async fn key_report(&self, principal: &PrincipalId) -> PrincipalKeyReport {
        let key_info = self.keyring.key_info(principal).await;
        let probe = self.test_encryption(principal).await;

        let mut recommendations = Vec::new();
        if !key_info.has_keys {
            recommendations.push("generate a key pair for this principal".to_string());
        } else if !key_info.is_valid {
            recommendations
                .push("regenerate keys - the current pair fails its round trip".to_string());
        } else if !probe.success {
            recommendations.push("investigate encryption/decryption issues".to_string());
        }
        if key_info.has_keys && key_info.is_valid && probe.success {
            recommendations.push("keys are working correctly - no action needed".to_string());
        }

        PrincipalKeyReport {
            principal_id: principal.clone(),
            key_info,
            probe,
            recommendations,
        }
    }
}

/// The fixed multi-field probe used by encryption tests.
fn probe_fields() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("first_name".to_string(), "John".to_string()),
        ("last_name".to_string(), "Doe".to_string()),
        ("address".to_string(), "123 Test Street".to_string()),
        ("phone".to_string(), "+1234567890".to_string()),
    ])
}
