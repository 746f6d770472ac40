use serde::{Deserialize, Serialize};

use crate::{ProviderId, Symbol, TickerFailure, UtcDateTime, ValidationError};

/// Shortest request id accepted in envelope metadata.
const MIN_REQUEST_ID_LEN: usize = 8;
const TRACE_ID_LEN: usize = 32;

/// Wrapper for every machine-readable `leadlag` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    /// Builds an envelope after validating the metadata and every error entry.
    pub fn new(
        meta: EnvelopeMeta,
        data: T,
        errors: Vec<EnvelopeError>,
    ) -> Result<Self, ValidationError> {
        meta.validate()?;
        errors.iter().try_for_each(EnvelopeError::validate)?;
        Ok(Self { meta, data, errors })
    }

    /// True when the run finished with skipped tickers or warnings.
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty() || !self.meta.warnings.is_empty()
    }
}

/// Metadata attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    pub schema_version: String,
    pub generated_at: UtcDateTime,
    pub source: ProviderId,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(
        request_id: impl Into<String>,
        schema_version: impl Into<String>,
        source: ProviderId,
        latency_ms: u64,
    ) -> Result<Self, ValidationError> {
        let meta = Self {
            request_id: request_id.into(),
            trace_id: None,
            schema_version: schema_version.into(),
            generated_at: UtcDateTime::now(),
            source,
            latency_ms,
            warnings: Vec::new(),
        };
        meta.validate()?;
        Ok(meta)
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Result<Self, ValidationError> {
        let trace_id = trace_id.into();
        if !is_trace_id(&trace_id) {
            return Err(ValidationError::InvalidTraceId);
        }
        self.trace_id = Some(trace_id);
        Ok(self)
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Request id of at least eight characters, 32-hex trace id, `vMAJOR.MINOR.PATCH` schema.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_id.trim().len() < MIN_REQUEST_ID_LEN {
            return Err(ValidationError::InvalidRequestId);
        }
        if self.trace_id.as_deref().is_some_and(|id| !is_trace_id(id)) {
            return Err(ValidationError::InvalidTraceId);
        }
        if !is_schema_version(&self.schema_version) {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }
        Ok(())
    }
}

/// Structured error payload for partial or failed responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    /// Set for per-ticker failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<Symbol>,
}

impl EnvelopeError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let error = Self {
            code: code.into(),
            message: message.into(),
            ticker: None,
        };
        error.validate()?;
        Ok(error)
    }

    /// Error entry for a ticker skipped during a scan.
    pub fn for_failure(failure: &TickerFailure) -> Result<Self, ValidationError> {
        Ok(Self::new(failure.code.as_str(), failure.message.as_str())?
            .with_ticker(failure.ticker.clone()))
    }

    pub fn with_ticker(mut self, ticker: Symbol) -> Self {
        self.ticker = Some(ticker);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyErrorCode);
        }
        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyErrorMessage);
        }
        Ok(())
    }
}

fn is_schema_version(value: &str) -> bool {
    let Some(version) = value.strip_prefix('v') else {
        return false;
    };
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

fn is_trace_id(value: &str) -> bool {
    value.len() == TRACE_ID_LEN
        && value.bytes().all(|b| b.is_ascii_hexdigit())
        && value.bytes().any(|b| b != b'0')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> EnvelopeMeta {
        EnvelopeMeta::new("request-12345", "v1.0.0", ProviderId::Stooq, 11).expect("meta")
    }

    #[test]
    fn accepts_well_formed_meta() {
        let meta = meta();

        assert_eq!(meta.schema_version, "v1.0.0");
        assert_eq!(meta.source, ProviderId::Stooq);
        assert!(meta.trace_id.is_none());
    }

    #[test]
    fn rejects_bad_schema_versions() {
        for version in ["1.0.0", "v1.0", "v1.0.0.1", "v1..0", "v1.x.0"] {
            let err = EnvelopeMeta::new("request-12345", version, ProviderId::Stooq, 1)
                .expect_err("must fail");
            assert!(matches!(err, ValidationError::InvalidSchemaVersion { .. }));
        }
    }

    #[test]
    fn rejects_short_request_id() {
        let err = EnvelopeMeta::new("req", "v1.0.0", ProviderId::Stooq, 1).expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidRequestId);
    }

    #[test]
    fn trace_id_must_be_nonzero_hex() {
        assert_eq!(
            meta().with_trace_id("not-a-trace-id").expect_err("must fail"),
            ValidationError::InvalidTraceId
        );
        assert!(meta().with_trace_id("0".repeat(32)).is_err());
        assert!(meta().with_trace_id("0af7651916cd43dd8448eb211c80319c").is_ok());
    }

    #[test]
    fn rejects_blank_error_fields() {
        assert_eq!(
            EnvelopeError::new("", "message").expect_err("must fail"),
            ValidationError::EmptyErrorCode
        );
        assert_eq!(
            EnvelopeError::new("source.no_data", "  ").expect_err("must fail"),
            ValidationError::EmptyErrorMessage
        );
    }

    #[test]
    fn skipped_ticker_serializes_with_its_ticker() {
        let failure = TickerFailure {
            ticker: Symbol::parse("ZIM").expect("symbol"),
            code: "source.no_data".to_owned(),
            message: "no data for ZIM".to_owned(),
        };
        let error = EnvelopeError::for_failure(&failure).expect("error");

        let envelope = Envelope::new(meta(), Vec::<u8>::new(), vec![error]).expect("envelope");

        assert!(envelope.is_partial());
        let json = serde_json::to_value(&envelope).expect("json");
        assert_eq!(json["errors"][0]["ticker"], "ZIM");
        assert_eq!(json["errors"][0]["code"], "source.no_data");
        assert_eq!(json["meta"]["source"], "stooq");
    }

    #[test]
    fn clean_envelope_omits_errors() {
        let envelope = Envelope::new(meta(), 1_u8, Vec::new()).expect("envelope");

        assert!(!envelope.is_partial());
        let json = serde_json::to_value(&envelope).expect("json");
        assert!(json.get("errors").is_none());
    }
}
