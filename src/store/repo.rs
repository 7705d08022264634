use crate::domain::email::ClassificationRecord;
use crate::error::Result;

/// Append-only sink for classification results.
pub trait ResultRecorder {
    fn append_record(&self, record: &ClassificationRecord) -> Result<()>;
}
