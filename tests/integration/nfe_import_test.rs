// End-to-end import flow over the in-memory backend

use std::sync::Arc;

use chrono::NaiveDate;
use payables_br::gateways::MemoryBackend;
use payables_br::installments::InstallmentCalculator;
use payables_br::nfe::{ImportOutcome, NfeImportService};
use rust_decimal_macros::dec;

const CHAVE: &str = "35170812345678000195550010000000011000000010";
const BUCKET: &str = "nfe-xml";

fn xml_with_duplicatas() -> String {
    format!(
        r#"<NFe><infNFe Id="NFe{chave}">
  <ide><mod>55</mod><serie>1</serie><nNF>123</nNF><dhEmi>2025-01-10T09:30:00-03:00</dhEmi></ide>
  <emit><CNPJ>11444777000161</CNPJ><xNome>Fornecedor Exemplo LTDA</xNome></emit>
  <dest><CNPJ>12345678000195</CNPJ><xNome>Cliente Exemplo SA</xNome></dest>
  <total><ICMSTot><vProd>1000.00</vProd><vNF>1000.00</vNF></ICMSTot></total>
  <cobr>
    <dup><nDup>001</nDup><dVenc>2025-02-10</dVenc><vDup>500.00</vDup></dup>
    <dup><nDup>002</nDup><dVenc>2025-03-10</dVenc><vDup>500.00</vDup></dup>
  </cobr>
</infNFe></NFe>"#,
        chave = CHAVE
    )
}

fn xml_without_duplicatas() -> String {
    format!(
        r#"<NFe><infNFe Id="NFe{chave}">
  <ide><mod>55</mod><serie>1</serie><nNF>456</nNF><dEmi>2025-01-10</dEmi></ide>
  <emit><CNPJ>11444777000161</CNPJ><xNome>Fornecedor Exemplo LTDA</xNome></emit>
  <total><ICMSTot><vNF>900.00</vNF></ICMSTot></total>
</infNFe></NFe>"#,
        chave = CHAVE
    )
}

fn service(backend: &Arc<MemoryBackend>) -> NfeImportService {
    NfeImportService::new(backend.clone(), backend.clone(), BUCKET)
}

#[tokio::test]
async fn test_import_stores_document_duplicatas_and_xml() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service(&backend);

    let outcome = service.import(&xml_with_duplicatas()).await.unwrap();
    match outcome {
        ImportOutcome::Imported { document, duplicatas } => {
            assert_eq!(document.chave_acesso, CHAVE);
            assert_eq!(duplicatas, 2);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    // document row upserted under its access key
    let docs = backend.rows("nfe_data");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["chave_acesso"], CHAVE);
    assert_eq!(docs[0]["valores"]["duplicatas_qtd"], 2);
    assert_eq!(docs[0]["valores"]["xml_path"], format!("xml/{}.xml", CHAVE));

    // duplicata rows carry the wire status vocabulary
    let dups = backend.rows("nfe_duplicatas");
    assert_eq!(dups.len(), 2);
    assert_eq!(dups[0]["num_dup"], "001");
    assert_eq!(dups[0]["status_target"], "a_vencer");
    assert!(dups[0]["pago_em"].is_null());

    // raw XML archived in the bucket
    let stored = backend.object(BUCKET, &format!("xml/{}.xml", CHAVE)).unwrap();
    assert_eq!(stored, xml_with_duplicatas().into_bytes());
}

#[tokio::test]
async fn test_reimport_replaces_previous_duplicatas() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service(&backend);

    service.import(&xml_with_duplicatas()).await.unwrap();
    assert_eq!(backend.rows("nfe_duplicatas").len(), 2);

    // second import of the same key replaces rather than appends
    service.import(&xml_with_duplicatas()).await.unwrap();
    assert_eq!(backend.rows("nfe_duplicatas").len(), 2);
    assert_eq!(backend.rows("nfe_data").len(), 1);
}

#[tokio::test]
async fn test_import_without_duplicatas_requests_manual_schedule() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service(&backend);

    let outcome = service.import(&xml_without_duplicatas()).await.unwrap();
    let document = match outcome {
        ImportOutcome::NeedsManualSchedule { document } => document,
        other => panic!("unexpected outcome: {:?}", other),
    };

    // the document row is stored even before the schedule exists
    assert_eq!(backend.rows("nfe_data").len(), 1);
    assert!(backend.rows("nfe_duplicatas").is_empty());

    // default manual grid: equal split from the emission date
    let fallback = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let plan = NfeImportService::manual_schedule(&document, 2, fallback, false).unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].amount, dec!(450.00));
    assert_eq!(plan[0].due_date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
    assert_eq!(plan[1].due_date, NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());

    let saved = service.save_manual_schedule(CHAVE, &plan).await.unwrap();
    assert_eq!(saved, 2);

    let dups = service.stored_duplicatas(CHAVE).await.unwrap();
    assert_eq!(dups.len(), 2);
    assert_eq!(dups[0]["num_dup"], "001");
    assert_eq!(dups[1]["num_dup"], "002");
}

#[tokio::test]
async fn test_settled_manual_schedule_persists_paid_rows() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service(&backend);

    let first_due = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
    let plan = InstallmentCalculator::generate(dec!(300.00), 3, first_due, true).unwrap();
    service.save_manual_schedule(CHAVE, &plan).await.unwrap();

    let dups = service.stored_duplicatas(CHAVE).await.unwrap();
    assert_eq!(dups.len(), 3);
    for dup in &dups {
        assert_eq!(dup["status_target"], "paga");
        assert_eq!(dup["pago_em"], dup["data_venc"]);
    }
}

#[tokio::test]
async fn test_manual_schedule_validations() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service(&backend);

    let plan = InstallmentCalculator::generate(
        dec!(100.00),
        1,
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        false,
    )
    .unwrap();

    // bad access key
    assert!(service.save_manual_schedule("123", &plan).await.is_err());
    // empty schedule
    assert!(service.save_manual_schedule(CHAVE, &[]).await.is_err());
}

#[tokio::test]
async fn test_rearchiving_same_xml_is_not_an_error() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service(&backend);

    service.import(&xml_with_duplicatas()).await.unwrap();
    // importing again re-uploads over the archived copy
    service.import(&xml_with_duplicatas()).await.unwrap();
    assert!(backend.object(BUCKET, &format!("xml/{}.xml", CHAVE)).is_some());
}
