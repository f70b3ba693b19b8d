//! Actual product hierarchy: AMP → components/ingredients and
//! AMP → AMPP → DMPP.

use chrono::NaiveDate;

use crate::row::TableRow;
use crate::value::{push_opt, FieldValue};
use crate::{tables, LangMap};

/// An actual (branded) medicinal product.
#[derive(Debug, Clone, PartialEq)]
pub struct Amp {
    /// Natural key (`"SAM123456-01"`).
    pub code: String,
    /// Official (registered) name.
    pub official_name: Option<String>,
    /// Multilingual prescription name.
    pub name: LangMap,
    /// Black-triangle pharmacovigilance marker.
    pub black_triangle: bool,
    /// Medicine type (allopathic, homeopathic, ...).
    pub medicine_type: Option<String>,
    /// Marketing authorization holder, zero-padded actor number.
    pub company_actor_nr: Option<String>,
    /// Referenced VMP code; existence not enforced at parse time.
    pub vmp_code: Option<String>,
    /// Authorization status.
    pub status: Option<String>,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for Amp {
    fn table(&self) -> &'static str {
        tables::AMP
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["code"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("code", FieldValue::Text(self.code.clone())),
            ("name", FieldValue::Text(self.name.to_json())),
            ("black_triangle", FieldValue::Bool(self.black_triangle)),
        ];
        push_opt(&mut columns, "official_name", self.official_name.clone());
        push_opt(&mut columns, "medicine_type", self.medicine_type.clone());
        push_opt(&mut columns, "company_actor_nr", self.company_actor_nr.clone());
        push_opt(&mut columns, "vmp_code", self.vmp_code.clone());
        push_opt(&mut columns, "status", self.status.clone());
        push_opt(&mut columns, "start_date", self.start_date);
        push_opt(&mut columns, "end_date", self.end_date);
        columns
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

/// One pharmaceutical component of an AMP.
#[derive(Debug, Clone, PartialEq)]
pub struct AmpComponent {
    /// Owning AMP code.
    pub amp_code: String,
    /// Sequence number within the AMP; part of the natural key.
    pub sequence_nr: i64,
    /// Pharmaceutical form code.
    pub pharmaceutical_form_code: Option<String>,
    /// Route of administration code.
    pub route_of_administration_code: Option<String>,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for AmpComponent {
    fn table(&self) -> &'static str {
        tables::AMP_COMPONENT
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["amp_code", "sequence_nr"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("amp_code", FieldValue::Text(self.amp_code.clone())),
            ("sequence_nr", FieldValue::Integer(self.sequence_nr)),
        ];
        push_opt(
            &mut columns,
            "pharmaceutical_form_code",
            self.pharmaceutical_form_code.clone(),
        );
        push_opt(
            &mut columns,
            "route_of_administration_code",
            self.route_of_administration_code.clone(),
        );
        push_opt(&mut columns, "start_date", self.start_date);
        push_opt(&mut columns, "end_date", self.end_date);
        columns
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

/// One ingredient of an AMP component.
#[derive(Debug, Clone, PartialEq)]
pub struct AmpIngredient {
    /// Owning AMP code.
    pub amp_code: String,
    /// Owning component sequence number.
    pub sequence_nr: i64,
    /// Rank within the component; completes the natural key.
    pub rank: i64,
    /// Referenced substance code.
    pub substance_code: Option<String>,
    /// ACTIVE_SUBSTANCE or EXCIPIENT.
    pub ingredient_type: Option<String>,
    /// Display strength (`"500 mg"`).
    pub strength: Option<String>,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for AmpIngredient {
    fn table(&self) -> &'static str {
        tables::AMP_INGREDIENT
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["amp_code", "sequence_nr", "rank"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("amp_code", FieldValue::Text(self.amp_code.clone())),
            ("sequence_nr", FieldValue::Integer(self.sequence_nr)),
            ("rank", FieldValue::Integer(self.rank)),
        ];
        push_opt(&mut columns, "substance_code", self.substance_code.clone());
        push_opt(&mut columns, "ingredient_type", self.ingredient_type.clone());
        push_opt(&mut columns, "strength", self.strength.clone());
        push_opt(&mut columns, "start_date", self.start_date);
        push_opt(&mut columns, "end_date", self.end_date);
        columns
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

/// A packaged AMP.
#[derive(Debug, Clone, PartialEq)]
pub struct Ampp {
    /// Natural key, composite extended CTI code.
    pub cti_extended: String,
    /// Owning AMP code.
    pub amp_code: String,
    /// Delivery modus code.
    pub delivery_modus: Option<String>,
    /// Marketing authorization number.
    pub authorization_nr: Option<String>,
    /// Human-readable pack size (`"30 tabl."`).
    pub pack_display_value: Option<String>,
    /// Commercialization status.
    pub status: Option<String>,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for Ampp {
    fn table(&self) -> &'static str {
        tables::AMPP
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["cti_extended"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("cti_extended", FieldValue::Text(self.cti_extended.clone())),
            ("amp_code", FieldValue::Text(self.amp_code.clone())),
        ];
        push_opt(&mut columns, "delivery_modus", self.delivery_modus.clone());
        push_opt(&mut columns, "authorization_nr", self.authorization_nr.clone());
        push_opt(
            &mut columns,
            "pack_display_value",
            self.pack_display_value.clone(),
        );
        push_opt(&mut columns, "status", self.status.clone());
        push_opt(&mut columns, "start_date", self.start_date);
        push_opt(&mut columns, "end_date", self.end_date);
        columns
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

/// A purchasable unit of an AMPP within one delivery environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Dmpp {
    /// Product code (CNK); part of the natural key.
    pub code: String,
    /// Delivery environment (P = public, H = hospital, ...).
    pub delivery_environment: String,
    /// Owning AMPP extended CTI code.
    pub ampp_cti_extended: Option<String>,
    /// Ex-factory price.
    pub price: Option<f64>,
    /// Whether the unit is reimbursable.
    pub reimbursable: Option<bool>,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for Dmpp {
    fn table(&self) -> &'static str {
        tables::DMPP
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["code", "delivery_environment"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("code", FieldValue::Text(self.code.clone())),
            (
                "delivery_environment",
                FieldValue::Text(self.delivery_environment.clone()),
            ),
        ];
        push_opt(
            &mut columns,
            "ampp_cti_extended",
            self.ampp_cti_extended.clone(),
        );
        push_opt(&mut columns, "price", self.price);
        push_opt(&mut columns, "reimbursable", self.reimbursable);
        push_opt(&mut columns, "start_date", self.start_date);
        push_opt(&mut columns, "end_date", self.end_date);
        columns
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}
