//! Shared application state for handlers.

use std::sync::Arc;

use verdict_core::SignatureVerifier;
use verdict_runtime::{PaymentGateway, PaymentSettings, RuntimeConfig, VerdictGenerator};

/// Shared application state. Cloned per request; everything inside is
/// immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Verdict generator (AI with fallback, or fallback only)
    pub generator: Arc<VerdictGenerator>,

    /// Order gateway, absent when payments are off or unconfigured
    pub gateway: Option<Arc<dyn PaymentGateway>>,

    /// Payment signature verifier, absent without a key secret
    pub verifier: Option<SignatureVerifier>,

    /// Pricing, currency and checkout settings
    pub settings: Arc<PaymentSettings>,

    /// Server version
    pub version: String,

    /// Server start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(
        generator: VerdictGenerator,
        gateway: Option<Arc<dyn PaymentGateway>>,
        verifier: Option<SignatureVerifier>,
        settings: PaymentSettings,
    ) -> Self {
        Self {
            generator: Arc::new(generator),
            gateway,
            verifier,
            settings: Arc::new(settings),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Build every runtime component from configuration.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(
            config.build_generator(),
            config.build_gateway(),
            config.build_verifier(),
            config.payment.clone(),
        )
    }

    /// Human-readable uptime, e.g. `42s`, `3m 5s`, `2h 10m`.
    pub fn uptime(&self) -> String {
        let secs = (chrono::Utc::now() - self.started_at).num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }

    /// Display price, e.g. `₹5` for 500 paise.
    pub fn price_label(&self) -> String {
        price_label(self.settings.price_minor, &self.settings.currency)
    }
}

pub(crate) fn price_label(price_minor: u64, currency: &str) -> String {
    let major = price_minor / 100;
    let minor = price_minor % 100;
    let amount = if minor == 0 {
        major.to_string()
    } else {
        format!("{}.{:02}", major, minor)
    };

    match currency {
        "INR" => format!("₹{}", amount),
        "USD" => format!("${}", amount),
        "EUR" => format!("€{}", amount),
        other => format!("{} {}", amount, other),
    }
}
