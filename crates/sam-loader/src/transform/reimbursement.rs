//! Transformer for the reimbursement context file.

use sam_types::{Record, ReimbursementContext};

use crate::context::SyncContext;
use crate::element::Element;
use crate::versioned::{current_version, validity};

use super::{opt_bool, opt_decimal, opt_text, required_attr, Transformed};

/// `<ReimbursementContext dmppCode="..." deliveryEnvironment="..."
/// legalReferencePath="...">`.
///
/// The referential check against `ctx` is deliberate: a context
/// pointing at a DMPP that no parsed AMP produced is an orphan and
/// must not reach the store.
pub fn transform_reimbursement_context(element: &Element, ctx: &SyncContext) -> Transformed {
    let (Some(dmpp_code), Some(delivery_environment)) = (
        required_attr(element, "dmppCode"),
        required_attr(element, "deliveryEnvironment"),
    ) else {
        return Transformed::Skipped("missing dmpp key");
    };
    let Some(legal_reference_path) = required_attr(element, "legalReferencePath") else {
        return Transformed::Skipped("missing legalReferencePath");
    };
    if !ctx.has_dmpp(&dmpp_code, &delivery_environment) {
        return Transformed::Skipped("unknown dmpp");
    }
    let Some(data) = current_version(element) else {
        return Transformed::Skipped("no current version");
    };
    let (start_date, end_date) = validity(data);
    Transformed::one(Record::ReimbursementContext(ReimbursementContext {
        dmpp_code,
        delivery_environment,
        legal_reference_path,
        criterion_category: opt_text(data, "CriterionCategory"),
        reimbursement_rate: opt_decimal(data, "ReimbursementRate"),
        reference_base_price: opt_decimal(data, "ReferenceBasePrice"),
        flat_rate_system: opt_bool(data, "FlatRateSystem"),
        start_date,
        end_date,
    }))
}
