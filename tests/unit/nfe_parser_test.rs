// NFe XML tag-extraction tests

use chrono::NaiveDate;
use payables_br::nfe::NfeXmlParser;
use rust_decimal_macros::dec;

const CHAVE: &str = "35170812345678000195550010000000011000000010";

fn nfe_with_duplicatas() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe" versao="4.00">
  <NFe>
    <infNFe Id="NFe{chave}" versao="4.00">
      <ide>
        <mod>55</mod>
        <serie>1</serie>
        <nNF>123</nNF>
        <dhEmi>2025-01-10T09:30:00-03:00</dhEmi>
      </ide>
      <emit>
        <CNPJ>11444777000161</CNPJ>
        <xNome>Fornecedor Exemplo LTDA</xNome>
        <xFant>Fornecedor</xFant>
      </emit>
      <dest>
        <CNPJ>12345678000195</CNPJ>
        <xNome>Cliente Exemplo SA</xNome>
      </dest>
      <det nItem="1">
        <prod>
          <xProd>Item qualquer</xProd>
          <vProd>400.00</vProd>
        </prod>
      </det>
      <det nItem="2">
        <prod>
          <xProd>Outro item</xProd>
          <vProd>600.00</vProd>
        </prod>
      </det>
      <total>
        <ICMSTot>
          <vProd>1000.00</vProd>
          <vDesc>10.00</vDesc>
          <vFrete>25.50</vFrete>
          <vOutro>0.00</vOutro>
          <vNF>1015,50</vNF>
        </ICMSTot>
      </total>
      <cobr>
        <dup>
          <nDup>001</nDup>
          <dVenc>2025-02-10</dVenc>
          <vDup>507.75</vDup>
        </dup>
        <dup>
          <nDup>002</nDup>
          <dVenc>2025-03-10</dVenc>
          <vDup>507.75</vDup>
        </dup>
      </cobr>
    </infNFe>
  </NFe>
  <protNFe>
    <infProt>
      <chNFe>{chave}</chNFe>
    </infProt>
  </protNFe>
</nfeProc>
"#,
        chave = CHAVE
    )
}

fn nfe_without_duplicatas() -> String {
    format!(
        r#"<NFe><infNFe Id="NFe{chave}">
  <ide><mod>55</mod><serie>2</serie><nNF>777</nNF><dEmi>2025-04-01</dEmi></ide>
  <emit><CNPJ>11444777000161</CNPJ><xFant>So Fantasia</xFant></emit>
  <total><ICMSTot><vNF>300.00</vNF></ICMSTot></total>
</infNFe></NFe>"#,
        chave = CHAVE
    )
}

#[test]
fn test_parses_header_totals_and_duplicatas() {
    let doc = NfeXmlParser::parse(&nfe_with_duplicatas()).unwrap();

    assert_eq!(doc.chave_acesso, CHAVE);
    assert_eq!(doc.numero.as_deref(), Some("123"));
    assert_eq!(doc.serie.as_deref(), Some("1"));
    assert_eq!(doc.modelo.as_deref(), Some("55"));
    assert_eq!(doc.data_emissao, NaiveDate::from_ymd_opt(2025, 1, 10));
    assert_eq!(doc.emitente.as_deref(), Some("Fornecedor Exemplo LTDA"));
    assert_eq!(doc.cnpj_emitente.as_deref(), Some("11444777000161"));
    assert_eq!(doc.destinatario.as_deref(), Some("Cliente Exemplo SA"));
    assert_eq!(doc.cnpj_destinatario.as_deref(), Some("12345678000195"));

    // totals come from ICMSTot, not from the per-item prod blocks,
    // and the comma decimal separator is accepted
    assert_eq!(doc.totals.total, dec!(1015.50));
    assert_eq!(doc.totals.produtos, dec!(1000.00));
    assert_eq!(doc.totals.desconto, dec!(10.00));
    assert_eq!(doc.totals.frete, dec!(25.50));
    assert_eq!(doc.totals.outros, dec!(0.00));

    assert_eq!(doc.duplicatas.len(), 2);
    assert_eq!(doc.duplicatas[0].num_dup.as_deref(), Some("001"));
    assert_eq!(doc.duplicatas[0].data_venc, NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
    assert_eq!(doc.duplicatas[0].valor, dec!(507.75));
    assert_eq!(doc.duplicatas[1].num_dup.as_deref(), Some("002"));
}

#[test]
fn test_access_key_falls_back_to_inf_nfe_id() {
    let doc = NfeXmlParser::parse(&nfe_without_duplicatas()).unwrap();
    assert_eq!(doc.chave_acesso, CHAVE);
    assert!(doc.duplicatas.is_empty());
    assert_eq!(doc.data_emissao, NaiveDate::from_ymd_opt(2025, 4, 1));
    // xNome missing, xFant fills in
    assert_eq!(doc.emitente.as_deref(), Some("So Fantasia"));
    assert_eq!(doc.totals.total, dec!(300.00));
}

#[test]
fn test_rejects_missing_or_short_access_key() {
    let no_key = "<NFe><infNFe><ide><nNF>1</nNF></ide></infNFe></NFe>";
    assert!(NfeXmlParser::parse(no_key).is_err());

    let short_key = r#"<NFe><infNFe Id="NFe123"><ide><nNF>1</nNF></ide></infNFe></NFe>"#;
    assert!(NfeXmlParser::parse(short_key).is_err());
}

#[test]
fn test_rejects_unreadable_xml() {
    assert!(NfeXmlParser::parse("<NFe><unclosed").is_err());
}

#[test]
fn test_duplicatas_without_due_date_or_value_are_dropped() {
    let xml = format!(
        r#"<NFe><infNFe Id="NFe{chave}">
  <ide><nNF>9</nNF></ide>
  <cobr>
    <dup><nDup>001</nDup><dVenc>2025-02-10</dVenc><vDup>100.00</vDup></dup>
    <dup><nDup>002</nDup><vDup>100.00</vDup></dup>
    <dup><nDup>003</nDup><dVenc>2025-04-10</dVenc><vDup>0.00</vDup></dup>
    <dup><dVenc>2025-05-10</dVenc><vDup>50.00</vDup></dup>
  </cobr>
</infNFe></NFe>"#,
        chave = CHAVE
    );
    let doc = NfeXmlParser::parse(&xml).unwrap();

    // rows 002 (no due date) and 003 (zero value) are dropped
    assert_eq!(doc.duplicatas.len(), 2);
    assert_eq!(doc.duplicatas[0].num_dup.as_deref(), Some("001"));
    assert_eq!(doc.duplicatas[1].num_dup, None);
    assert_eq!(doc.duplicatas[1].valor, dec!(50.00));
}
