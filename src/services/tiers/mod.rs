//! Management tier updates pushed by the tiering service.

use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::core::{AppError, AppResult};
use crate::domain::entities::ManagementTier;
use crate::repositories::offenders::{OffenderRepository, TierRepository};
use crate::services::lookup::LookupService;
use crate::services::telemetry::{properties, TelemetryClient};

pub struct TierService {
    offenders: Arc<dyn OffenderRepository>,
    tiers: Arc<dyn TierRepository>,
    lookup: Arc<LookupService>,
    telemetry: Arc<dyn TelemetryClient>,
}

impl TierService {
    pub fn new(
        offenders: Arc<dyn OffenderRepository>,
        tiers: Arc<dyn TierRepository>,
        lookup: Arc<LookupService>,
        telemetry: Arc<dyn TelemetryClient>,
    ) -> Self {
        Self {
            offenders,
            tiers,
            lookup,
            telemetry,
        }
    }

    /// Records tier `U<tier>` as the offender's current management tier.
    ///
    /// Every failure is tracked before the 404 is returned.
    pub async fn update_tier(&self, crn: &str, tier: &str, acting_user: &str) -> AppResult<()> {
        let fail = |event: &str, message: String| {
            self.telemetry
                .track_event(event, properties([("crn", crn), ("tier", tier)]));
            AppError::NotFound(message)
        };

        let mut offender = self
            .offenders
            .find_by_crn(crn)
            .await?
            .ok_or_else(|| fail("TierUpdateFailureOffenderNotFound", format!("Offender with CRN {} not found", crn)))?;

        let tier_code = format!("U{}", tier);
        let updated_tier = self
            .lookup
            .tier(&tier_code)
            .await?
            .ok_or_else(|| fail("TierUpdateFailureTierNotFound", format!("Tier {} not found", tier)))?;

        let change_reason = self.lookup.ats_tier_change_reason().await?.ok_or_else(|| {
            fail(
                "TierUpdateFailureTierChangeReasonNotFound",
                "Tier change reason ATS not found".to_string(),
            )
        })?;

        self.tiers
            .save(&ManagementTier {
                offender_id: offender.offender_id,
                tier: updated_tier,
                tier_change_reason: change_reason,
                date_changed: Utc::now().naive_utc(),
                created_by_user_id: self.lookup.user_id_for(acting_user).await?,
            })
            .await?;

        offender.current_tier = Some(tier_code);
        self.offenders.save(&offender).await?;

        info!("Tier of {} updated to {}", crn, tier);
        self.telemetry
            .track_event("TierUpdateSuccess", properties([("crn", crn), ("tier", tier)]));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::in_memory::seed;
    use crate::services::testing::TestServices;

    #[actix_web::test]
    async fn test_update_tier() {
        let t = TestServices::new();

        t.context
            .tiers
            .update_tier(seed::CRN, "A1", seed::ACTING_USERNAME)
            .await
            .unwrap();

        let tiers = t.store.management_tiers().unwrap();
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0].tier.code_value, "UA1");
        assert_eq!(tiers[0].tier_change_reason.code_value, "ATS");
        assert_eq!(tiers[0].created_by_user_id, seed::ACTING_USER_ID);

        let offender = OffenderRepository::find_by_crn(t.store.as_ref(), seed::CRN)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(offender.current_tier.as_deref(), Some("UA1"));

        let events = t.telemetry.events();
        assert_eq!(events[0].0, "TierUpdateSuccess");
        assert_eq!(events[0].1["crn"], seed::CRN);
        assert_eq!(events[0].1["tier"], "A1");
    }

    #[actix_web::test]
    async fn test_unknown_offender_and_tier_are_tracked() {
        let t = TestServices::new();

        let offender = t
            .context
            .tiers
            .update_tier("X999999", "A1", seed::ACTING_USERNAME)
            .await
            .unwrap_err();
        assert_eq!(offender.message(), "Offender with CRN X999999 not found");

        let tier = t
            .context
            .tiers
            .update_tier(seed::CRN, "Z9", seed::ACTING_USERNAME)
            .await
            .unwrap_err();
        assert!(matches!(tier, AppError::NotFound(_)));

        assert_eq!(
            t.telemetry.event_names(),
            vec!["TierUpdateFailureOffenderNotFound", "TierUpdateFailureTierNotFound"]
        );
        assert!(t.store.management_tiers().unwrap().is_empty());
    }
}
