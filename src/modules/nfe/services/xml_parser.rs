//! Tag-level extraction of NFe XML.
//!
//! The NFe layouts in the wild vary (procNFe envelopes, missing optional
//! blocks, comma decimal separators), so instead of a full schema mapping
//! this reads the event stream and picks the tags the payables flow needs:
//! identification, parties, totals and the `cobr/dup` billing block.

use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::documents::services::br_doc::only_digits;
use crate::modules::installments::models::InstallmentStatus;
use crate::modules::nfe::models::{Duplicata, NfeDocument, NfeTotals};

/// Access keys are always 44 digits
pub const CHAVE_ACESSO_LEN: usize = 44;

pub struct NfeXmlParser;

#[derive(Default)]
struct DupBuilder {
    n_dup: Option<String>,
    d_venc: Option<String>,
    v_dup: Option<String>,
    from_cobr: bool,
}

#[derive(Default)]
struct Extraction {
    chave: Option<String>,
    inf_nfe_id: Option<String>,
    numero: Option<String>,
    serie: Option<String>,
    modelo: Option<String>,
    dh_emi: Option<String>,
    d_emi: Option<String>,
    emit_nome: Option<String>,
    emit_fant: Option<String>,
    emit_cnpj: Option<String>,
    dest_nome: Option<String>,
    dest_fant: Option<String>,
    dest_cnpj: Option<String>,
    totals: NfeTotals,
    dups: Vec<DupBuilder>,
}

impl NfeXmlParser {
    /// Extracts an [`NfeDocument`] from raw XML text.
    ///
    /// Fails only when the XML itself is unreadable or no valid 44-digit
    /// access key can be found; every other field degrades to `None`/zero.
    pub fn parse(xml: &str) -> Result<NfeDocument> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut state = Extraction::default();
        let mut stack: Vec<String> = Vec::new();
        let mut current_dup: Option<DupBuilder> = None;
        let mut in_cobr = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    Self::note_inf_nfe_id(&mut state, &name, &e);
                    match name.as_str() {
                        "cobr" => in_cobr = true,
                        "dup" => {
                            current_dup =
                                Some(DupBuilder { from_cobr: in_cobr, ..Default::default() })
                        }
                        _ => {}
                    }
                    stack.push(name);
                }
                // self-closing elements never carry text, only attributes
                Ok(Event::Empty(e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    Self::note_inf_nfe_id(&mut state, &name, &e);
                }
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    match name.as_str() {
                        "cobr" => in_cobr = false,
                        "dup" => {
                            if let Some(dup) = current_dup.take() {
                                state.dups.push(dup);
                            }
                        }
                        _ => {}
                    }
                    stack.pop();
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| AppError::xml(e.to_string()))?
                        .trim()
                        .to_string();
                    if text.is_empty() {
                        continue;
                    }
                    Self::assign(&mut state, &mut current_dup, &stack, text);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(AppError::xml(e.to_string())),
            }
        }

        if let Some(dup) = current_dup.take() {
            state.dups.push(dup);
        }

        state.into_document()
    }

    fn note_inf_nfe_id(state: &mut Extraction, name: &str, e: &quick_xml::events::BytesStart<'_>) {
        if name != "infNFe" || state.inf_nfe_id.is_some() {
            return;
        }
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"Id" {
                if let Ok(value) = attr.unescape_value() {
                    state.inf_nfe_id = Some(value.into_owned());
                }
            }
        }
    }

    fn assign(
        state: &mut Extraction,
        current_dup: &mut Option<DupBuilder>,
        stack: &[String],
        text: String,
    ) {
        let tag = match stack.last() {
            Some(tag) => tag.as_str(),
            None => return,
        };
        let within = |name: &str| stack.iter().any(|s| s == name);

        if let Some(dup) = current_dup.as_mut() {
            match tag {
                "nDup" => set_first(&mut dup.n_dup, text),
                "dVenc" => set_first(&mut dup.d_venc, text),
                "vDup" => set_first(&mut dup.v_dup, text),
                _ => {}
            }
            return;
        }

        match tag {
            "chNFe" => set_first(&mut state.chave, text),
            "nNF" if within("ide") => set_first(&mut state.numero, text),
            "serie" if within("ide") => set_first(&mut state.serie, text),
            "mod" if within("ide") => set_first(&mut state.modelo, text),
            "dhEmi" if within("ide") => set_first(&mut state.dh_emi, text),
            "dEmi" if within("ide") => set_first(&mut state.d_emi, text),
            "xNome" if within("emit") => set_first(&mut state.emit_nome, text),
            "xFant" if within("emit") => set_first(&mut state.emit_fant, text),
            "CNPJ" if within("emit") => set_first(&mut state.emit_cnpj, text),
            "xNome" if within("dest") => set_first(&mut state.dest_nome, text),
            "xFant" if within("dest") => set_first(&mut state.dest_fant, text),
            "CNPJ" if within("dest") => set_first(&mut state.dest_cnpj, text),
            // totals come from the ICMSTot block only; per-item prod blocks
            // repeat the same tag names with per-line values
            "vNF" if within("ICMSTot") => state.totals.total = parse_decimal(&text),
            "vProd" if within("ICMSTot") => state.totals.produtos = parse_decimal(&text),
            "vDesc" if within("ICMSTot") => state.totals.desconto = parse_decimal(&text),
            "vFrete" if within("ICMSTot") => state.totals.frete = parse_decimal(&text),
            "vOutro" if within("ICMSTot") => state.totals.outros = parse_decimal(&text),
            _ => {}
        }
    }
}

impl Extraction {
    fn into_document(self) -> Result<NfeDocument> {
        let chave = self
            .chave
            .or_else(|| {
                self.inf_nfe_id
                    .as_deref()
                    .and_then(|id| id.strip_prefix("NFe"))
                    .map(str::to_string)
            })
            .unwrap_or_default();
        let chave = chave.trim().to_string();
        if chave.len() != CHAVE_ACESSO_LEN || only_digits(&chave).len() != CHAVE_ACESSO_LEN {
            return Err(AppError::xml("Access key must be 44 digits"));
        }

        let emission = self.dh_emi.or(self.d_emi).and_then(|raw| parse_date(&raw));

        // Prefer duplicatas from the billing block when one exists
        let has_cobr = self.dups.iter().any(|d| d.from_cobr);
        let duplicatas = self
            .dups
            .into_iter()
            .filter(|d| !has_cobr || d.from_cobr)
            .filter_map(|d| {
                let data_venc = parse_date(d.d_venc.as_deref()?)?;
                let valor = parse_decimal(d.v_dup.as_deref()?);
                if valor <= Decimal::ZERO {
                    return None;
                }
                Some(Duplicata {
                    num_dup: d.n_dup.filter(|n| !n.is_empty()),
                    data_venc,
                    valor,
                    status_target: InstallmentStatus::Pending,
                    pago_em: None,
                })
            })
            .collect();

        Ok(NfeDocument {
            chave_acesso: chave,
            numero: self.numero,
            serie: self.serie,
            modelo: self.modelo,
            data_emissao: emission,
            emitente: self.emit_nome.or(self.emit_fant),
            cnpj_emitente: self.emit_cnpj,
            destinatario: self.dest_nome.or(self.dest_fant),
            cnpj_destinatario: self.dest_cnpj,
            totals: self.totals,
            duplicatas,
        })
    }
}

fn set_first(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

/// Accepts comma decimal separators; anything unparsable reads as zero.
fn parse_decimal(text: &str) -> Decimal {
    text.trim().replace(',', ".").parse().unwrap_or(Decimal::ZERO)
}

/// Reads the date prefix of `yyyy-MM-dd` or `yyyy-MM-ddTHH:MM:SS-03:00`.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let prefix = text.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}
