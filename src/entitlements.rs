use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Client-side premium flag. Unlocked out of band once a payment has been
/// confirmed by hand; nothing here verifies that payment.
#[derive(Debug, Default)]
pub struct Entitlements {
    premium: AtomicBool,
}

impl Entitlements {
    pub fn new(premium: bool) -> Self {
        Self {
            premium: AtomicBool::new(premium),
        }
    }

    pub fn is_premium(&self) -> bool {
        self.premium.load(Ordering::SeqCst)
    }

    pub fn grant(&self) {
        if !self.premium.swap(true, Ordering::SeqCst) {
            info!("premium unlocked");
        }
    }

    pub fn revoke(&self) {
        if self.premium.swap(false, Ordering::SeqCst) {
            info!("premium revoked");
        }
    }

    pub fn set(&self, enabled: bool) {
        if enabled {
            self.grant();
        } else {
            self.revoke();
        }
    }
}
