use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::ocr::OcrBackend;
use crate::scoring::SimilarityScorer;
use crate::storage::{AnswerLog, QuestionStore, SubmissionStore, TeacherGuideLog, UploadStore};

#[derive(Clone)]
pub struct HandlerState {
    pub scorer: Arc<SimilarityScorer>,

    pub questions: Arc<QuestionStore>,

    pub submissions: Arc<SubmissionStore>,

    pub answers: Arc<AnswerLog>,

    pub teacher_guides: Arc<TeacherGuideLog>,

    pub uploads: UploadStore,

    pub ocr: Arc<dyn OcrBackend>,

    pub data_dir: PathBuf,

    pub max_upload_bytes: usize,
}

impl HandlerState {
    /// Opens every collection under `data_dir`. Files are created lazily on first use.
    pub fn new(
        data_dir: impl Into<PathBuf>,
        scorer: Arc<SimilarityScorer>,
        ocr: Arc<dyn OcrBackend>,
    ) -> Self {
        let data_dir = data_dir.into();
        Self {
            scorer,
            questions: Arc::new(QuestionStore::in_dir(&data_dir)),
            submissions: Arc::new(SubmissionStore::in_dir(&data_dir)),
            answers: Arc::new(AnswerLog::in_dir(&data_dir)),
            teacher_guides: Arc::new(TeacherGuideLog::in_dir(&data_dir)),
            uploads: UploadStore::in_dir(&data_dir),
            ocr,
            data_dir,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_upload_limit(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
