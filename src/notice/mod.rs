//! Localized user-facing notices.
//!
//! Every failure the user can see is reported as a short bilingual message;
//! nothing here is fatal.

use crate::editor::EditorError;
use crate::site::{Language, LocalizedString};
use crate::sync::{LoadReport, PublishOutcome, PublishReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaOp {
    Upload,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: LocalizedString,
}

impl Notice {
    fn new(level: NoticeLevel, ar: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            level,
            message: LocalizedString::new(ar, en),
        }
    }

    pub fn render(&self, lang: Language) -> &str {
        self.message.translate(lang)
    }

    pub fn draft_saved() -> Self {
        Self::new(
            NoticeLevel::Success,
            "تم حفظ التعديلات كمسودة محلية",
            "Changes saved as a local draft",
        )
    }

    pub fn draft_discarded() -> Self {
        Self::new(NoticeLevel::Success, "تم حذف المسودة المحلية", "Local draft discarded")
    }

    /// Warning naming pages that fell back to earlier layers, if any.
    pub fn from_load(report: &LoadReport) -> Option<Self> {
        let failed = report.failed_pages();
        if failed.is_empty() {
            return None;
        }
        let names = failed.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ");
        Some(Self::new(
            NoticeLevel::Warning,
            format!("تعذر تحميل بعض الصفحات ({names})، تم عرض القيم السابقة"),
            format!("Could not load {names}; showing previous values"),
        ))
    }

    pub fn from_publish(report: &PublishReport) -> Self {
        match report.outcome {
            PublishOutcome::Full => Self::new(
                NoticeLevel::Success,
                "تم نشر جميع الصفحات بنجاح",
                "All pages published successfully",
            ),
            PublishOutcome::Partial => Self::new(
                NoticeLevel::Warning,
                format!(
                    "تم نشر {} من أصل {} صفحات، بعض الصفحات لم تُحفظ",
                    report.succeeded, report.attempted
                ),
                format!(
                    "Published {} of {} pages; some pages were not saved",
                    report.succeeded, report.attempted
                ),
            ),
            PublishOutcome::Failed => Self::new(
                NoticeLevel::Error,
                "فشل نشر الإعدادات",
                "Failed to publish settings",
            ),
        }
    }

    pub fn media_failed(op: MediaOp, error: &EditorError) -> Self {
        tracing::debug!(error = %error, "Media operation failed");
        match op {
            MediaOp::Upload => {
                Self::new(NoticeLevel::Error, "فشل رفع الصورة", "Image upload failed")
            }
            MediaOp::Delete => {
                Self::new(NoticeLevel::Error, "فشل حذف الصورة", "Image delete failed")
            }
        }
    }

    pub fn editor_failed(error: &EditorError) -> Self {
        Self::new(
            NoticeLevel::Error,
            format!("تعذر تطبيق التعديل: {error}"),
            format!("Could not apply edit: {error}"),
        )
    }
}
