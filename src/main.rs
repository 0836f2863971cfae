//! NFe XML inspector: parses a fiscal XML file and prints what the importer
//! would store, including the default manual schedule when the document
//! carries no duplicatas.

use payables_br::config::Config;
use payables_br::core::money::format_brl;
use payables_br::installments::InstallmentCalculator;
use payables_br::nfe::NfeXmlParser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> std::process::ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payables_br=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Config::from_env() {
        Ok(config) => tracing::info!("Backend configured at {}", config.backend.url),
        Err(e) => tracing::warn!("Running without backend configuration: {}", e),
    }

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: payables-br <nfe.xml>");
            return std::process::ExitCode::FAILURE;
        }
    };

    let xml = match std::fs::read_to_string(&path) {
        Ok(xml) => xml,
        Err(e) => {
            eprintln!("Cannot read {}: {}", path, e);
            return std::process::ExitCode::FAILURE;
        }
    };

    let document = match NfeXmlParser::parse(&xml) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Cannot parse {}: {}", path, e);
            return std::process::ExitCode::FAILURE;
        }
    };

    println!("Chave de acesso: {}", document.chave_acesso);
    println!(
        "NFe {} / serie {} (modelo {})",
        document.numero.as_deref().unwrap_or("-"),
        document.serie.as_deref().unwrap_or("-"),
        document.modelo.as_deref().unwrap_or("-")
    );
    println!(
        "Emitente: {} ({})",
        document.emitente.as_deref().unwrap_or("-"),
        document.cnpj_emitente.as_deref().unwrap_or("-")
    );
    println!(
        "Destinatario: {} ({})",
        document.destinatario.as_deref().unwrap_or("-"),
        document.cnpj_destinatario.as_deref().unwrap_or("-")
    );
    match document.data_emissao {
        Some(date) => println!("Emissao: {}", date),
        None => println!("Emissao: -"),
    }
    println!("Total: {}", format_brl(document.totals.total));

    if document.duplicatas.is_empty() {
        println!("Sem duplicatas no XML; previa de parcelamento em 2x:");
        let base_date = document
            .data_emissao
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        match InstallmentCalculator::generate(document.totals.total, 2, base_date, false) {
            Ok(plan) => {
                for installment in plan {
                    println!(
                        "  {:03}  {}  {}",
                        installment.number,
                        installment.due_date,
                        format_brl(installment.amount)
                    );
                }
            }
            Err(e) => eprintln!("Cannot build schedule preview: {}", e),
        }
    } else {
        println!("Duplicatas ({}):", document.duplicatas.len());
        for (i, dup) in document.duplicatas.iter().enumerate() {
            println!(
                "  {}  {}  {}",
                dup.num_dup.clone().unwrap_or_else(|| format!("{:03}", i + 1)),
                dup.data_venc,
                format_brl(dup.valor)
            );
        }
    }

    std::process::ExitCode::SUCCESS
}
