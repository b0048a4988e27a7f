//! A full run: load the datasets, pick the classifier, distribute, write.

use std::sync::Arc;

use tracing::info;

use crate::classify::{Classifier, KeywordClassifier, LlmClassifier};
use crate::config::AppConfig;
use crate::error::Result;
use crate::ingest::{Dataset, write_results_to_path};
use crate::llm::create_provider;
use crate::routing::{DistributionEngine, DistributionReport};

/// LLM-backed classifier when one is configured, keyword rules otherwise.
pub fn build_classifier(config: &AppConfig) -> Result<Arc<dyn Classifier>> {
    match &config.llm {
        Some(llm_config) => {
            let llm = create_provider(llm_config)?;
            info!(
                backend = llm_config.backend.label(),
                model = llm.model_name(),
                "Using LLM classifier"
            );
            Ok(Arc::new(LlmClassifier::new(llm, config.classifier.clone())))
        }
        None => {
            info!("Using keyword classifier");
            Ok(Arc::new(KeywordClassifier::default_rules()))
        }
    }
}

/// Run one distribution over the configured files and write the output.
pub async fn run(config: &AppConfig) -> Result<DistributionReport> {
    let dataset = Dataset::load(
        &config.tickets_path,
        &config.managers_path,
        &config.units_path,
    )?;
    let classifier = build_classifier(config)?;

    let mut engine = DistributionEngine::new(
        dataset.managers,
        &dataset.units,
        classifier,
        config.distribution.clone(),
    );
    let report = engine.distribute(&dataset.tickets).await;

    write_results_to_path(&config.output_path, &report.results)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::config::{ClassifierConfig, DistributionConfig};
    use crate::error::{Error, IngestError};

    fn config(dir: &Path) -> AppConfig {
        AppConfig {
            tickets_path: dir.join("tickets.csv"),
            managers_path: dir.join("managers.csv"),
            units_path: dir.join("units.csv"),
            output_path: dir.join("out").join("assignments.csv"),
            distribution: DistributionConfig::default(),
            llm: None,
            classifier: ClassifierConfig::default(),
        }
    }

    #[test]
    fn keyword_classifier_without_llm() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = build_classifier(&config(dir.path())).unwrap();
        assert_eq!(classifier.name(), "keywords");
    }

    #[tokio::test]
    async fn run_writes_one_row_per_ticket() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fs::write(
            &config.tickets_path,
            "guid,description,segment,country,city\nT1,ошибка,MASS,Казахстан,Алматы\nT2,,VIP,Казахстан,Алматы\n",
        )
        .unwrap();
        fs::write(
            &config.managers_path,
            "name,position,skills,load,office\nСерик,Специалист,,2,Алматы\n",
        )
        .unwrap();
        fs::write(&config.units_path, "office\nАстана\nАлматы\n").unwrap();

        let report = run(&config).await.unwrap();
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.assigned, 1);

        let text = fs::read_to_string(&config.output_path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[tokio::test]
    async fn missing_input_surfaces_as_ingest_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&config(dir.path())).await.unwrap_err();
        assert!(matches!(err, Error::Ingest(IngestError::Io(_))));
        assert!(!dir.path().join("out").exists());
    }
}
