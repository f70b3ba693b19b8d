//! Transformer for the actual product hierarchy file.
//!
//! One `<Amp>` element carries its components, ingredients, packages
//! and purchasable units as nested children, so a single source
//! element fans out into rows for up to five tables. Every DMPP key
//! encountered here is registered in the [`SyncContext`] for the
//! reimbursement file's referential check.

use sam_types::{Amp, AmpComponent, AmpIngredient, Ampp, Company, Dmpp, Record};

use crate::context::SyncContext;
use crate::element::Element;
use crate::versioned::{current_version, validity};

use super::{attr_integer, child_code, opt_bool, opt_decimal, opt_text, required_attr, Transformed};

/// `<Amp code="...">` with nested components, ingredients, AMPPs and
/// DMPPs.
///
/// Child entities with a malformed key or no current version are
/// counted as drops on `ctx` without discarding their siblings; a
/// missing AMP-level key or name drops the whole subtree.
pub fn transform_amp(element: &Element, ctx: &mut SyncContext) -> Transformed {
    let Some(amp_code) = required_attr(element, "code") else {
        return Transformed::Skipped("missing code");
    };
    let Some(data) = current_version(element) else {
        return Transformed::Skipped("no current version");
    };
    let name = data.lang_map("Name");
    if name.is_empty() {
        return Transformed::Skipped("missing name");
    }
    let (start_date, end_date) = validity(data);

    let mut rows = vec![Record::Amp(Amp {
        code: amp_code.clone(),
        official_name: opt_text(data, "OfficialName"),
        name,
        black_triangle: opt_bool(data, "BlackTriangle").unwrap_or(false),
        medicine_type: opt_text(data, "MedicineType"),
        company_actor_nr: opt_text(data, "CompanyActorNr")
            .map(|raw| Company::pad_actor_nr(&raw)),
        vmp_code: opt_text(data, "VmpCode"),
        status: opt_text(data, "Status"),
        start_date,
        end_date,
    })];

    for component in element.children_named("AmpComponent") {
        collect_component(component, &amp_code, ctx, &mut rows);
    }
    for ampp in element.children_named("Ampp") {
        collect_ampp(ampp, &amp_code, ctx, &mut rows);
    }

    Transformed::Rows(rows)
}

fn collect_component(
    component: &Element,
    amp_code: &str,
    ctx: &mut SyncContext,
    rows: &mut Vec<Record>,
) {
    let Some(sequence_nr) = attr_integer(component, "sequenceNr") else {
        ctx.record_drop("AmpComponent", "missing sequenceNr");
        return;
    };
    let Some(data) = current_version(component) else {
        ctx.record_drop("AmpComponent", "no current version");
        return;
    };
    let (start_date, end_date) = validity(data);
    rows.push(Record::AmpComponent(AmpComponent {
        amp_code: amp_code.to_string(),
        sequence_nr,
        pharmaceutical_form_code: child_code(data, "PharmaceuticalForm"),
        route_of_administration_code: child_code(data, "RouteOfAdministration"),
        start_date,
        end_date,
    }));

    for ingredient in component.children_named("Ingredient") {
        let Some(rank) = attr_integer(ingredient, "rank") else {
            ctx.record_drop("AmpIngredient", "missing rank");
            continue;
        };
        let Some(data) = current_version(ingredient) else {
            ctx.record_drop("AmpIngredient", "no current version");
            continue;
        };
        let (start_date, end_date) = validity(data);
        rows.push(Record::AmpIngredient(AmpIngredient {
            amp_code: amp_code.to_string(),
            sequence_nr,
            rank,
            substance_code: child_code(data, "Substance"),
            ingredient_type: opt_text(data, "Type"),
            strength: opt_text(data, "Strength"),
            start_date,
            end_date,
        }));
    }
}

fn collect_ampp(ampp: &Element, amp_code: &str, ctx: &mut SyncContext, rows: &mut Vec<Record>) {
    let Some(cti_extended) = required_attr(ampp, "ctiExtended") else {
        ctx.record_drop("Ampp", "missing ctiExtended");
        return;
    };
    let Some(data) = current_version(ampp) else {
        ctx.record_drop("Ampp", "no current version");
        return;
    };
    let (start_date, end_date) = validity(data);
    rows.push(Record::Ampp(Ampp {
        cti_extended: cti_extended.clone(),
        amp_code: amp_code.to_string(),
        delivery_modus: opt_text(data, "DeliveryModus"),
        authorization_nr: opt_text(data, "AuthorizationNr"),
        pack_display_value: opt_text(data, "PackDisplayValue"),
        status: opt_text(data, "Status"),
        start_date,
        end_date,
    }));

    for dmpp in ampp.children_named("Dmpp") {
        let (Some(code), Some(delivery_environment)) = (
            required_attr(dmpp, "code"),
            required_attr(dmpp, "deliveryEnvironment"),
        ) else {
            ctx.record_drop("Dmpp", "missing key");
            continue;
        };
        let Some(data) = current_version(dmpp) else {
            ctx.record_drop("Dmpp", "no current version");
            continue;
        };
        let (start_date, end_date) = validity(data);
        ctx.register_dmpp(&code, &delivery_environment);
        rows.push(Record::Dmpp(Dmpp {
            code,
            delivery_environment,
            ampp_cti_extended: Some(cti_extended.clone()),
            price: opt_decimal(data, "Price"),
            reimbursable: opt_bool(data, "Reimbursable"),
            start_date,
            end_date,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::testutil::parse_one;
    use chrono::NaiveDate;
    use sam_types::{tables, TableRow};

    fn ctx() -> SyncContext {
        SyncContext::new(NaiveDate::from_ymd_opt(2022, 7, 1).unwrap())
    }

    const FULL_AMP: &str = r#"<r><ns3:Amp code="SAM123456-01">
        <ns3:Data from="2018-04-01">
            <OfficialName>Dafalgan 500 mg</OfficialName>
            <Name xml:lang="nl">Dafalgan</Name>
            <Name xml:lang="fr">Dafalgan</Name>
            <BlackTriangle>false</BlackTriangle>
            <MedicineType>ALLOPATHIC</MedicineType>
            <CompanyActorNr>42</CompanyActorNr>
            <VmpCode>12345</VmpCode>
            <Status>AUTHORIZED</Status>
        </ns3:Data>
        <ns3:AmpComponent sequenceNr="1">
            <ns3:Data from="2018-04-01">
                <PharmaceuticalForm code="FRM1"/>
                <RouteOfAdministration code="RTE1"/>
            </ns3:Data>
            <ns3:Ingredient rank="1">
                <ns3:Data from="2018-04-01">
                    <Substance code="SUB1"/>
                    <Type>ACTIVE_SUBSTANCE</Type>
                    <Strength>500 mg</Strength>
                </ns3:Data>
            </ns3:Ingredient>
        </ns3:AmpComponent>
        <ns3:Ampp ctiExtended="CTI001">
            <ns3:Data from="2018-04-01">
                <AuthorizationNr>BE123456</AuthorizationNr>
                <PackDisplayValue>30 tabl.</PackDisplayValue>
                <Status>COMMERCIALIZED</Status>
            </ns3:Data>
            <ns3:Dmpp code="0039347" deliveryEnvironment="P">
                <ns3:Data from="2018-04-01">
                    <Price>7.53</Price>
                    <Reimbursable>true</Reimbursable>
                </ns3:Data>
            </ns3:Dmpp>
        </ns3:Ampp>
    </ns3:Amp></r>"#;

    #[test]
    fn test_amp_fans_out_one_row_per_table() {
        let element = parse_one(FULL_AMP, "Amp");
        let mut ctx = ctx();

        let Transformed::Rows(rows) = transform_amp(&element, &mut ctx) else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 5);
        let count = |table: &str| rows.iter().filter(|r| r.table() == table).count();
        assert_eq!(count(tables::AMP), 1);
        assert_eq!(count(tables::AMP_COMPONENT), 1);
        assert_eq!(count(tables::AMP_INGREDIENT), 1);
        assert_eq!(count(tables::AMPP), 1);
        assert_eq!(count(tables::DMPP), 1);
        assert!(ctx.has_dmpp("0039347", "P"));
    }

    #[test]
    fn test_amp_fields_resolved() {
        let element = parse_one(FULL_AMP, "Amp");
        let mut ctx = ctx();
        let Transformed::Rows(rows) = transform_amp(&element, &mut ctx) else {
            panic!("expected rows");
        };

        let Record::Amp(amp) = &rows[0] else {
            panic!("amp row first");
        };
        assert_eq!(amp.company_actor_nr.as_deref(), Some("00042"));
        assert!(!amp.black_triangle);

        let ingredient = rows
            .iter()
            .find_map(|r| match r {
                Record::AmpIngredient(i) => Some(i),
                _ => None,
            })
            .unwrap();
        assert_eq!(ingredient.substance_code.as_deref(), Some("SUB1"));
        assert_eq!(ingredient.strength.as_deref(), Some("500 mg"));
        assert_eq!(ingredient.natural_key(), "SAM123456-01:1:1");

        let dmpp = rows
            .iter()
            .find_map(|r| match r {
                Record::Dmpp(d) => Some(d),
                _ => None,
            })
            .unwrap();
        assert_eq!(dmpp.ampp_cti_extended.as_deref(), Some("CTI001"));
        assert_eq!(dmpp.price, Some(7.53));
        assert_eq!(dmpp.natural_key(), "0039347:P");
    }

    #[test]
    fn test_broken_child_is_dropped_without_losing_siblings() {
        let doc = r#"<r><Amp code="SAM1">
            <Data from="2020-01-01"><Name xml:lang="nl">x</Name></Data>
            <AmpComponent><Data from="2020-01-01"/></AmpComponent>
            <AmpComponent sequenceNr="2"><Data from="2020-01-01"/></AmpComponent>
        </Amp></r>"#;
        let element = parse_one(doc, "Amp");
        let mut ctx = ctx();

        let Transformed::Rows(rows) = transform_amp(&element, &mut ctx) else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(
            ctx.drops().get("AmpComponent: missing sequenceNr"),
            Some(&1)
        );
    }

    #[test]
    fn test_amp_without_code_is_skipped() {
        let doc = r#"<r><Amp><Data from="2020-01-01"><Name xml:lang="nl">x</Name></Data></Amp></r>"#;
        let element = parse_one(doc, "Amp");
        assert!(matches!(
            transform_amp(&element, &mut ctx()),
            Transformed::Skipped("missing code")
        ));
    }
}
