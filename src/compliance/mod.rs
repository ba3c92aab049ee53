//! Checks a proposed order against Maryland possession limits.
//!
//! Totals accumulate the patient's existing possession plus every item in
//! the order; concentrate and edible items additionally contribute THC
//! milligrams derived from their labeled percentage.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::assignment::AssignmentItem;
use crate::models::order::ItemKind;
use crate::models::patient::Possession;

pub const FLOWER_LIMIT_GRAMS: f64 = 120.0;
pub const CONCENTRATE_LIMIT_GRAMS: f64 = 36.0;
pub const THC_LIMIT_MG: f64 = 1_800.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub within_flower_limit: bool,
    pub within_concentrate_limit: bool,
    pub within_thc_limit: bool,
    pub message: String,
}

impl ComplianceCheck {
    pub fn is_compliant(&self) -> bool {
        self.within_flower_limit && self.within_concentrate_limit && self.within_thc_limit
    }
}

/// Parses a display quantity such as "3.5g" into grams.
fn parse_grams(raw: &str) -> Result<f64, AppError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('g').unwrap_or(trimmed).trim_end();

    let grams: f64 = digits
        .parse()
        .map_err(|_| AppError::MalformedInput(format!("invalid quantity {raw:?}")))?;

    if !grams.is_finite() || grams < 0.0 {
        return Err(AppError::MalformedInput(format!(
            "quantity must be a non-negative number, got {raw:?}"
        )));
    }

    Ok(grams)
}

/// Parses a labeled THC percentage such as "20%".
fn parse_thc_percent(raw: &str) -> Result<f64, AppError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();

    let percent: f64 = digits
        .parse()
        .map_err(|_| AppError::MalformedInput(format!("invalid THC percentage {raw:?}")))?;

    if !percent.is_finite() || percent < 0.0 {
        return Err(AppError::MalformedInput(format!(
            "THC percentage must be a non-negative number, got {raw:?}"
        )));
    }

    Ok(percent)
}

fn thc_mg(percent: f64, grams: f64) -> f64 {
    percent / 100.0 * grams * 1_000.0
}

/// Returns per-limit verdicts plus a human-readable message. Only the first
/// violated limit is reported, in priority order flower -> concentrate ->
/// THC; this mirrors how the driver app surfaces the result.
pub fn check_compliance(
    possession: &Possession,
    items: &[AssignmentItem],
) -> Result<ComplianceCheck, AppError> {
    let mut total_flower = possession.flower_grams;
    let mut total_concentrate = possession.concentrate_grams;
    let mut total_thc = possession.thc_mg;

    for item in items {
        let grams = parse_grams(&item.quantity)?;

        match item.kind {
            ItemKind::Flower => total_flower += grams,
            ItemKind::Concentrate => {
                total_concentrate += grams;
                total_thc += thc_mg(parse_thc_percent(&item.thc)?, grams);
            }
            ItemKind::Edible => {
                total_thc += thc_mg(parse_thc_percent(&item.thc)?, grams);
            }
            ItemKind::Other => {}
        }
    }

    let within_flower_limit = total_flower <= FLOWER_LIMIT_GRAMS;
    let within_concentrate_limit = total_concentrate <= CONCENTRATE_LIMIT_GRAMS;
    let within_thc_limit = total_thc <= THC_LIMIT_MG;

    let message = if !within_flower_limit {
        format!(
            "Exceeds flower limit by {:.1}g",
            total_flower - FLOWER_LIMIT_GRAMS
        )
    } else if !within_concentrate_limit {
        format!(
            "Exceeds concentrate limit by {:.1}g",
            total_concentrate - CONCENTRATE_LIMIT_GRAMS
        )
    } else if !within_thc_limit {
        format!("Exceeds THC limit by {:.0}mg", total_thc - THC_LIMIT_MG)
    } else {
        "Order is compliant with MMCC regulations".to_string()
    };

    Ok(ComplianceCheck {
        within_flower_limit,
        within_concentrate_limit,
        within_thc_limit,
        message,
    })
}

#[cfg(test)]
mod tests {
    use crate::models::patient::Possession;

    use super::*;

    fn item(kind: ItemKind, quantity: &str, thc: &str) -> AssignmentItem {
        AssignmentItem {
            name: "Blue Dream".to_string(),
            kind,
            quantity: quantity.to_string(),
            thc: thc.to_string(),
        }
    }

    #[test]
    fn small_order_is_compliant() {
        let check = check_compliance(
            &Possession::default(),
            &[item(ItemKind::Flower, "3.5g", "20%")],
        )
        .unwrap();

        assert!(check.is_compliant());
        assert_eq!(check.message, "Order is compliant with MMCC regulations");
    }

    #[test]
    fn flower_over_limit_reports_excess() {
        let check = check_compliance(
            &Possession::default(),
            &[item(ItemKind::Flower, "130g", "20%")],
        )
        .unwrap();

        assert!(!check.within_flower_limit);
        assert!(check.within_concentrate_limit);
        assert!(check.within_thc_limit);
        assert_eq!(check.message, "Exceeds flower limit by 10.0g");
    }

    #[test]
    fn existing_possession_counts_toward_limits() {
        let possession = Possession {
            flower_grams: 115.0,
            concentrate_grams: 0.0,
            thc_mg: 0.0,
        };

        let check =
            check_compliance(&possession, &[item(ItemKind::Flower, "10g", "20%")]).unwrap();

        assert!(!check.within_flower_limit);
        assert_eq!(check.message, "Exceeds flower limit by 5.0g");
    }

    #[test]
    fn concentrate_contributes_grams_and_thc() {
        // 40g at 90%: over the 36g concentrate cap and well over 1800mg THC.
        let check = check_compliance(
            &Possession::default(),
            &[item(ItemKind::Concentrate, "40g", "90%")],
        )
        .unwrap();

        assert!(!check.within_concentrate_limit);
        assert!(!check.within_thc_limit);
        // Concentrate outranks THC in the message.
        assert_eq!(check.message, "Exceeds concentrate limit by 4.0g");
    }

    #[test]
    fn edibles_only_count_thc() {
        // 10g at 25% = 2500mg THC, but no flower or concentrate grams.
        let check = check_compliance(
            &Possession::default(),
            &[item(ItemKind::Edible, "10g", "25%")],
        )
        .unwrap();

        assert!(check.within_flower_limit);
        assert!(check.within_concentrate_limit);
        assert!(!check.within_thc_limit);
        assert_eq!(check.message, "Exceeds THC limit by 700mg");
    }

    #[test]
    fn other_items_are_ignored() {
        let check = check_compliance(
            &Possession::default(),
            &[item(ItemKind::Other, "500g", "99%")],
        )
        .unwrap();

        assert!(check.is_compliant());
    }

    #[test]
    fn flower_violation_outranks_thc_violation() {
        let check = check_compliance(
            &Possession::default(),
            &[
                item(ItemKind::Flower, "130g", "20%"),
                item(ItemKind::Edible, "20g", "50%"),
            ],
        )
        .unwrap();

        assert!(!check.within_flower_limit);
        assert!(!check.within_thc_limit);
        assert_eq!(check.message, "Exceeds flower limit by 10.0g");
    }

    #[test]
    fn adding_items_never_lowers_a_total() {
        let base = check_compliance(
            &Possession::default(),
            &[item(ItemKind::Flower, "100g", "20%")],
        )
        .unwrap();
        assert!(base.within_flower_limit);

        let augmented = check_compliance(
            &Possession::default(),
            &[
                item(ItemKind::Flower, "100g", "20%"),
                item(ItemKind::Flower, "30g", "20%"),
            ],
        )
        .unwrap();
        assert!(!augmented.within_flower_limit);
    }

    #[test]
    fn malformed_quantity_is_rejected() {
        let err = check_compliance(
            &Possession::default(),
            &[item(ItemKind::Flower, "an eighth", "20%")],
        )
        .unwrap_err();

        assert!(matches!(err, AppError::MalformedInput(_)));
    }

    #[test]
    fn malformed_thc_percentage_is_rejected() {
        let err = check_compliance(
            &Possession::default(),
            &[item(ItemKind::Edible, "10g", "strong")],
        )
        .unwrap_err();

        assert!(matches!(err, AppError::MalformedInput(_)));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let err = check_compliance(
            &Possession::default(),
            &[item(ItemKind::Flower, "-5g", "20%")],
        )
        .unwrap_err();

        assert!(matches!(err, AppError::MalformedInput(_)));
    }

    #[test]
    fn quantity_without_unit_marker_parses() {
        let check = check_compliance(
            &Possession::default(),
            &[item(ItemKind::Flower, "3.5", "20%")],
        )
        .unwrap();

        assert!(check.is_compliant());
    }
}
