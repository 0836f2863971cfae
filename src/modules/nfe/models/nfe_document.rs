use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::Result;
use crate::modules::installments::models::{Installment, InstallmentStatus};

/// Monetary totals block of an NFe (`ICMSTot`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NfeTotals {
    /// Final document value (`vNF`)
    pub total: Decimal,
    /// Goods value (`vProd`)
    pub produtos: Decimal,
    /// Discount (`vDesc`)
    pub desconto: Decimal,
    /// Freight (`vFrete`)
    pub frete: Decimal,
    /// Other charges (`vOutro`)
    pub outros: Decimal,
}

/// One duplicata (billing installment) carried in the NFe `cobr` block,
/// or entered manually when the XML has none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duplicata {
    /// Duplicata number as printed on the document (`nDup`)
    pub num_dup: Option<String>,
    /// Due date (`dVenc`)
    pub data_venc: NaiveDate,
    /// Amount (`vDup`)
    pub valor: Decimal,
    pub status_target: InstallmentStatus,
    pub pago_em: Option<NaiveDate>,
}

impl Duplicata {
    /// Wire form of a generated installment; the duplicata number is the
    /// installment number zero-padded to three digits.
    pub fn from_installment(installment: &Installment) -> Self {
        Self {
            num_dup: Some(format!("{:03}", installment.number)),
            data_venc: installment.due_date,
            valor: installment.amount,
            status_target: installment.status,
            pago_em: installment.paid_on,
        }
    }

    /// Row payload for the `nfe_duplicatas` table. `position` fills in the
    /// duplicata number when the XML omitted it.
    pub fn to_row(&self, chave_acesso: &str, position: usize) -> Value {
        let num_dup = self
            .num_dup
            .clone()
            .unwrap_or_else(|| format!("{:03}", position + 1));
        json!({
            "chave_acesso": chave_acesso,
            "num_dup": num_dup,
            "data_venc": self.data_venc,
            "valor": self.valor,
            "status_target": self.status_target,
            "pago_em": self.pago_em,
        })
    }
}

/// An electronic fiscal invoice as extracted from its XML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NfeDocument {
    /// 44-digit access key
    pub chave_acesso: String,
    pub numero: Option<String>,
    pub serie: Option<String>,
    pub modelo: Option<String>,
    pub data_emissao: Option<NaiveDate>,
    pub emitente: Option<String>,
    pub cnpj_emitente: Option<String>,
    pub destinatario: Option<String>,
    pub cnpj_destinatario: Option<String>,
    pub totals: NfeTotals,
    pub duplicatas: Vec<Duplicata>,
}

impl NfeDocument {
    /// Upsert payload for the `nfe_data` table, keyed on the access key.
    /// The nested `valores` object mirrors what the review screens read.
    pub fn to_row(&self, xml_path: &str) -> Result<Value> {
        let none_if_zero = |v: Decimal| if v.is_zero() { None } else { Some(v) };
        Ok(json!({
            "chave_acesso": self.chave_acesso,
            "emitente": self.emitente,
            "destinatario": self.destinatario,
            "numero": self.numero,
            "serie": self.serie,
            "modelo": self.modelo,
            "data_emissao": self.data_emissao,
            "valor_total": none_if_zero(self.totals.total),
            "cnpj_emitente": self.cnpj_emitente,
            "cnpj_destinatario": self.cnpj_destinatario,
            "valores": {
                "total": none_if_zero(self.totals.total),
                "produtos": none_if_zero(self.totals.produtos),
                "desconto": none_if_zero(self.totals.desconto),
                "frete": none_if_zero(self.totals.frete),
                "outros": none_if_zero(self.totals.outros),
                "xml_path": xml_path,
                "duplicatas_qtd": self.duplicatas.len(),
            },
        }))
    }
}
