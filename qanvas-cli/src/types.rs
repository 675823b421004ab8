//! Common types used across CLI modules

use clap::ValueEnum;
use qanvas_core::domain::kind::JobKind;

/// Job kind as spelled on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Chart rendered from chart options
    Chart,
    /// OpenDocument filled from a template
    OpenDocument,
    /// Document in any format filled from a template
    Document,
}

impl From<KindArg> for JobKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Chart => JobKind::Chart,
            KindArg::OpenDocument => JobKind::OpenDocument,
            KindArg::Document => JobKind::GenericDocument,
        }
    }
}
