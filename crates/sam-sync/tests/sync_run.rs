//! End-to-end sync runs over a miniature export directory.

use std::fs;
use std::path::{Path, PathBuf};

use sam_sync::{LocalDirDownloader, SamStore, SyncConfig, SyncCoordinator, SyncError};
use sam_types::tables;

const REF: &str = r#"<ns2:ExportReference xmlns:ns2="urn:sam:refdata">
    <ns2:Substance code="SUB1">
        <ns2:Data from="2010-01-01"><Name xml:lang="nl">Paracetamol</Name></ns2:Data>
    </ns2:Substance>
    <ns2:Atc code="N02BE01">
        <ns2:Data from="2010-01-01"><Description>paracetamol</Description></ns2:Data>
    </ns2:Atc>
    <ns2:PharmaceuticalForm code="FRM1">
        <ns2:Data from="2010-01-01"><Name xml:lang="nl">Tablet</Name></ns2:Data>
    </ns2:PharmaceuticalForm>
    <ns2:RouteOfAdministration code="RTE1">
        <ns2:Data from="2010-01-01"><Name xml:lang="nl">Oraal</Name></ns2:Data>
    </ns2:RouteOfAdministration>
</ns2:ExportReference>"#;

const CMP: &str = r#"<ns2:ExportCompanies xmlns:ns2="urn:sam:company">
    <ns2:Company actorNr="42">
        <ns2:Data from="1999-01-01"><Name xml:lang="nl">Janssen-Cilag</Name></ns2:Data>
    </ns2:Company>
</ns2:ExportCompanies>"#;

const LGL: &str = r#"<ns7:ExportLegalData xmlns:ns7="urn:sam:legal">
    <ns7:LegalBasis key="RD-2001-12-21">
        <ns7:Data from="2001-12-21">
            <Title xml:lang="fr">Arrêté royal du 21 décembre 2001</Title>
        </ns7:Data>
        <ns7:LegalReference key="art-1">
            <ns7:Data from="2001-12-21"><Title xml:lang="fr">Article 1</Title></ns7:Data>
            <ns7:LegalText sequenceNr="1">
                <ns7:Data from="2001-12-21">
                    <Content xml:lang="fr">Texte unique.</Content>
                </ns7:Data>
            </ns7:LegalText>
        </ns7:LegalReference>
    </ns7:LegalBasis>
</ns7:ExportLegalData>"#;

const VMP: &str = r#"<ns4:ExportVirtualMedicines xmlns:ns4="urn:sam:vmp">
    <ns4:Vtm code="VTM9">
        <ns4:Data from="2015-01-01"><Name xml:lang="nl">Paracetamol</Name></ns4:Data>
    </ns4:Vtm>
    <ns4:VmpGroup code="GRP4">
        <ns4:Data from="2015-01-01"><Name xml:lang="nl">Paracetamol oraal</Name></ns4:Data>
    </ns4:VmpGroup>
    <ns4:Vmp code="12345">
        <ns4:Data from="2015-01-01">
            <Name xml:lang="nl">paracetamol 500 mg oraal</Name>
            <Vtm code="VTM9"/>
            <VmpGroup code="GRP4"/>
        </ns4:Data>
    </ns4:Vmp>
</ns4:ExportVirtualMedicines>"#;

const AMP: &str = r#"<ns3:ExportActualMedicines xmlns:ns3="urn:sam:amp">
    <ns3:Amp code="SAM123456-01">
        <ns3:Data from="2018-04-01">
            <OfficialName>Dafalgan 500 mg</OfficialName>
            <Name xml:lang="nl">Dafalgan</Name>
            <CompanyActorNr>42</CompanyActorNr>
            <VmpCode>12345</VmpCode>
        </ns3:Data>
        <ns3:AmpComponent sequenceNr="1">
            <ns3:Data from="2018-04-01">
                <PharmaceuticalForm code="FRM1"/>
                <RouteOfAdministration code="RTE1"/>
            </ns3:Data>
            <ns3:Ingredient rank="1">
                <ns3:Data from="2018-04-01">
                    <Substance code="SUB1"/>
                    <Strength>500 mg</Strength>
                </ns3:Data>
            </ns3:Ingredient>
        </ns3:AmpComponent>
        <ns3:Ampp ctiExtended="CTI001">
            <ns3:Data from="2018-04-01">
                <PackDisplayValue>30 tabl.</PackDisplayValue>
            </ns3:Data>
            <ns3:Dmpp code="0039347" deliveryEnvironment="P">
                <ns3:Data from="2018-04-01">
                    <Price>7.53</Price>
                    <Reimbursable>true</Reimbursable>
                </ns3:Data>
            </ns3:Dmpp>
        </ns3:Ampp>
    </ns3:Amp>
</ns3:ExportActualMedicines>"#;

const RMB: &str = r#"<ns5:ExportReimbursements xmlns:ns5="urn:sam:rmb">
    <ns5:ReimbursementContext dmppCode="0039347" deliveryEnvironment="P"
            legalReferencePath="RD-2001-12-21/art-1">
        <ns5:Data from="2019-01-01"><CriterionCategory>B</CriterionCategory></ns5:Data>
    </ns5:ReimbursementContext>
    <ns5:ReimbursementContext dmppCode="9999999" deliveryEnvironment="P"
            legalReferencePath="RD-2001-12-21/art-1">
        <ns5:Data from="2019-01-01"><CriterionCategory>A</CriterionCategory></ns5:Data>
    </ns5:ReimbursementContext>
</ns5:ExportReimbursements>"#;

const CIV: &str = r#"<ns6:ExportChapterIV xmlns:ns6="urn:sam:civ">
    <ns6:Paragraph chapterName="IV" paragraphName="1230000">
        <ns6:Data from="2015-01-01"><KeyStringNl>gliptinen</KeyStringNl></ns6:Data>
    </ns6:Paragraph>
</ns6:ExportChapterIV>"#;

fn write_export(dir: &Path) {
    let files = [
        ("REF-1.37.2.xml", REF),
        ("CMP-1.37.2.xml", CMP),
        ("LGL-1.37.2.xml", LGL),
        ("VMP-1.37.2.xml", VMP),
        ("AMP-1.37.2.xml", AMP),
        ("RMB-1.37.2.xml", RMB),
        ("CIV-1.37.2.xml", CIV),
    ];
    for (name, body) in files {
        fs::write(dir.join(name), body).unwrap();
    }
}

struct Env {
    _dir: tempfile::TempDir,
    source: PathBuf,
    db: PathBuf,
    progress: PathBuf,
}

fn env() -> Env {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("export");
    fs::create_dir(&source).unwrap();
    write_export(&source);
    Env {
        db: dir.path().join("sam.db"),
        progress: dir.path().join("progress.json"),
        _dir: dir,
        source,
    }
}

fn coordinator(env: &Env) -> SyncCoordinator<LocalDirDownloader> {
    let config = SyncConfig::new(env.db.clone(), env.progress.clone());
    SyncCoordinator::new(config, LocalDirDownloader::new(env.source.clone()))
}

fn live_counts(db: &Path) -> Vec<(&'static str, usize)> {
    let store = SamStore::open(db).unwrap();
    tables::ALL
        .iter()
        .map(|table| (*table, store.table_count(table).unwrap()))
        .collect()
}

#[test]
fn test_full_sync_populates_every_table() {
    let env = env();
    let report = coordinator(&env).run().unwrap();

    assert_eq!(report.export_version.as_deref(), Some("1.37.2"));
    assert!(!report.dry_run);
    // The orphan reimbursement context was the only drop.
    assert_eq!(
        report.drops.get("ReimbursementContext: unknown dmpp"),
        Some(&1)
    );

    for (table, count) in live_counts(&env.db) {
        assert_eq!(count, 1, "table {table}");
    }
    assert!(env.progress.exists());
}

#[test]
fn test_rerun_is_idempotent() {
    let env = env();
    coordinator(&env).run().unwrap();
    coordinator(&env).run().unwrap();

    for (table, count) in live_counts(&env.db) {
        assert_eq!(count, 1, "table {table}");
    }
}

#[test]
fn test_missing_required_file_aborts_before_writing() {
    let env = env();
    fs::remove_file(env.source.join("CMP-1.37.2.xml")).unwrap();

    let err = coordinator(&env).run().unwrap_err();
    match err {
        SyncError::MissingSourceFiles { files } => assert_eq!(files, "CMP"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        live_counts(&env.db).iter().map(|(_, c)| c).sum::<usize>(),
        0
    );
}

#[test]
fn test_gate_failure_leaves_live_store_untouched() {
    let env = env();
    coordinator(&env).run().unwrap();

    // A second export whose legal file yields nothing: the basis has
    // no title, so every legal table stays empty and the gate trips.
    fs::write(
        env.source.join("LGL-1.37.2.xml"),
        r#"<r><LegalBasis key="B"><Data from="2001-01-01"/></LegalBasis></r>"#,
    )
    .unwrap();

    let err = coordinator(&env).run().unwrap_err();
    match err {
        SyncError::IncompleteRun { tables } => {
            assert!(tables.contains("legal_basis"));
            assert!(tables.contains("legal_text"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // The first run's data is still live.
    for (table, count) in live_counts(&env.db) {
        assert_eq!(count, 1, "table {table}");
    }
}

#[test]
fn test_dry_run_writes_nothing() {
    let env = env();
    let mut config = SyncConfig::new(env.db.clone(), env.progress.clone());
    config.dry_run = true;
    let mut coordinator =
        SyncCoordinator::new(config, LocalDirDownloader::new(env.source.clone()));

    let report = coordinator.run().unwrap();
    assert!(report.dry_run);
    assert!(report.tables.values().sum::<usize>() >= tables::ALL.len());

    assert_eq!(
        live_counts(&env.db).iter().map(|(_, c)| c).sum::<usize>(),
        0
    );
    assert!(!env.progress.exists());
}

#[test]
fn test_dry_run_still_enforces_completeness_gate() {
    let env = env();
    // The legal file yields no rows, so a real run would trip the
    // gate; the dry run must reject the dataset the same way.
    fs::write(
        env.source.join("LGL-1.37.2.xml"),
        r#"<r><LegalBasis key="B"><Data from="2001-01-01"/></LegalBasis></r>"#,
    )
    .unwrap();

    let mut config = SyncConfig::new(env.db.clone(), env.progress.clone());
    config.dry_run = true;
    let mut coordinator =
        SyncCoordinator::new(config, LocalDirDownloader::new(env.source.clone()));

    let err = coordinator.run().unwrap_err();
    match err {
        SyncError::IncompleteRun { tables } => assert!(tables.contains("legal_basis")),
        other => panic!("unexpected error: {other}"),
    }
    // Still a dry run: nothing was written.
    assert_eq!(
        live_counts(&env.db).iter().map(|(_, c)| c).sum::<usize>(),
        0
    );
}

#[test]
fn test_resume_skips_imported_files_and_reseeds_validator() {
    let env = env();

    // Simulate an interrupted run that had staged the AMP file: the
    // staging tables exist, the AMP tables hold rows, and the
    // progress file marks the AMP file as imported.
    {
        let store = SamStore::open(&env.db).unwrap();
        store.reset_staging().unwrap();
        let conn = store.connection();
        conn.execute(
            "INSERT INTO \"stg_amp\" (\"code\", \"name\", \"black_triangle\") VALUES ('SAM123456-01', '{}', 0)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO \"stg_amp_component\" (\"amp_code\", \"sequence_nr\") VALUES ('SAM123456-01', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO \"stg_amp_ingredient\" (\"amp_code\", \"sequence_nr\", \"rank\") VALUES ('SAM123456-01', 1, 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO \"stg_ampp\" (\"cti_extended\", \"amp_code\") VALUES ('CTI001', 'SAM123456-01')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO \"stg_dmpp\" (\"code\", \"delivery_environment\") VALUES ('0039347', 'P')",
            [],
        )
        .unwrap();
    }
    let mut progress = sam_sync::SyncProgress::new();
    progress.advance(sam_sync::Phase::Import);
    progress
        .imported_files
        .insert(sam_types::FileType::AmpHierarchy);
    progress.save(&env.progress).unwrap();

    let mut config = SyncConfig::new(env.db.clone(), env.progress.clone());
    config.resume = true;
    let mut coordinator =
        SyncCoordinator::new(config, LocalDirDownloader::new(env.source.clone()));
    let report = coordinator.run().unwrap();

    // The reimbursement context was validated against the reseeded
    // key set rather than being dropped as an orphan.
    assert_eq!(report.drops.get("ReimbursementContext: unknown dmpp"), Some(&1));
    let store = SamStore::open(&env.db).unwrap();
    assert_eq!(store.table_count(tables::REIMBURSEMENT_CONTEXT).unwrap(), 1);
    // The staged AMP row survived untouched into the live tables.
    assert_eq!(store.table_count(tables::AMP).unwrap(), 1);
}
