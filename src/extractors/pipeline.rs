// src/extractors/pipeline.rs
use crate::contract::models::{Block, ContractData, ContractInfo};
use crate::extractors::header::extract_header;
use crate::extractors::rows::extract_rows;
use crate::extractors::segment::{segment_text, Segment};
use crate::extractors::totals::extract_totals;
use crate::pdf;
use crate::utils::config::ExtractorConfig;
use crate::utils::error::ExtractError;

/// Turns the acquired document text into the nested contract record.
///
/// Each call is self-contained; nothing is shared between documents.
pub struct ContractExtractor {
    config: ExtractorConfig,
}

impl ContractExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Full pipeline over raw PDF bytes. Text acquisition runs on the blocking pool.
    pub async fn extract_pdf(&self, bytes: Vec<u8>) -> Result<ContractData, ExtractError> {
        let text = pdf::acquire_text(bytes).await?;
        tracing::debug!("Acquired {} characters of text", text.len());
        self.extract_text(&text)
    }

    /// Header, segments, rows, totals, then assembly.
    pub fn extract_text(&self, text: &str) -> Result<ContractData, ExtractError> {
        let header = extract_header(text);
        let segments = segment_text(text);
        self.assemble(header, &segments)
    }

    /// Builds the block list from the segments, dropping those without rows.
    ///
    /// Fails only when no block was kept and no contract header was recognized.
    pub fn assemble(&self, header: ContractInfo, segments: &[Segment<'_>]) -> Result<ContractData, ExtractError> {
        let mut blocks: Vec<Block> = Vec::new();

        for segment in segments {
            let beneficiaries = extract_rows(segment.text, self.config.amount_policy)?;
            let totals = extract_totals(segment.text);

            if beneficiaries.is_empty() {
                tracing::debug!(
                    "Dropping date {} (bytes {}..{}): no beneficiary rows",
                    segment.date,
                    segment.start,
                    segment.end
                );
                continue;
            }

            tracing::debug!("Block {} ({}): {} rows", blocks.len() + 1, segment.date, beneficiaries.len());
            blocks.push(Block {
                block_id: blocks.len() + 1,
                reference_date: segment.date.to_string(),
                beneficiaries,
                totals,
            });
        }

        if blocks.is_empty() && !header.is_recognized() {
            tracing::error!("No contract header and no beneficiary rows across {} segments", segments.len());
            return Err(ExtractError::ExtractionError(
                "document format not recognized: no contract header or beneficiary rows found".to_string(),
            ));
        }

        tracing::info!(
            "Extracted contract {} with {} blocks from {} distinct dates",
            header.contract_number_or_unknown(),
            blocks.len(),
            segments.len()
        );

        Ok(ContractData { contract_info: header, blocks })
    }
}

impl Default for ContractExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}
