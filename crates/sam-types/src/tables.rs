//! Target table names.

/// Substance reference data.
pub const SUBSTANCE: &str = "substance";
/// ATC classification codes.
pub const ATC_CLASSIFICATION: &str = "atc_classification";
/// Pharmaceutical forms.
pub const PHARMACEUTICAL_FORM: &str = "pharmaceutical_form";
/// Routes of administration.
pub const ROUTE_OF_ADMINISTRATION: &str = "route_of_administration";
/// Companies (marketing authorization holders).
pub const COMPANY: &str = "company";
/// Virtual therapeutic moieties.
pub const VTM: &str = "vtm";
/// VMP groups.
pub const VMP_GROUP: &str = "vmp_group";
/// Virtual medicinal products.
pub const VMP: &str = "vmp";
/// Actual medicinal products.
pub const AMP: &str = "amp";
/// AMP components (form + route per sequence).
pub const AMP_COMPONENT: &str = "amp_component";
/// AMP ingredients.
pub const AMP_INGREDIENT: &str = "amp_ingredient";
/// Packaged AMPs.
pub const AMPP: &str = "ampp";
/// Purchasable units.
pub const DMPP: &str = "dmpp";
/// Reimbursement contexts.
pub const REIMBURSEMENT_CONTEXT: &str = "reimbursement_context";
/// Chapter IV paragraphs.
pub const CHAPTER_IV_PARAGRAPH: &str = "chapter_iv_paragraph";
/// Legal bases.
pub const LEGAL_BASIS: &str = "legal_basis";
/// Legal references (path-keyed, recursive).
pub const LEGAL_REFERENCE: &str = "legal_reference";
/// Legal texts (path-keyed, sequence-ordered).
pub const LEGAL_TEXT: &str = "legal_text";

/// Every target table, parents before children.
///
/// The finalize swap walks this order so that a parent table is never
/// visible in its new state while a child still shows the old one.
pub const ALL: [&str; 18] = [
    SUBSTANCE,
    ATC_CLASSIFICATION,
    PHARMACEUTICAL_FORM,
    ROUTE_OF_ADMINISTRATION,
    COMPANY,
    LEGAL_BASIS,
    LEGAL_REFERENCE,
    LEGAL_TEXT,
    VTM,
    VMP_GROUP,
    VMP,
    AMP,
    AMP_COMPONENT,
    AMP_INGREDIENT,
    AMPP,
    DMPP,
    REIMBURSEMENT_CONTEXT,
    CHAPTER_IV_PARAGRAPH,
];
