use crate::decorations::{DecorationSet, DecorationSource, ImagePreviews, Theme};
use crate::editing::{Cmd, Document, DocumentError, Transaction};

/// A document with the image preview extension attached.
///
/// `dispatch` applies a command, reparses, and recomputes decorations before
/// returning, so a transaction is never observable half-applied.
#[derive(Debug)]
pub struct Editor {
    document: Document,
    previews: ImagePreviews,
}

impl Editor {
    pub fn new(document: Document, theme: Theme) -> Self {
        let mut previews = ImagePreviews::new(theme);
        previews.attach(&document);
        Self { document, previews }
    }

    pub fn from_bytes(bytes: &[u8], theme: Theme) -> Result<Self, DocumentError> {
        Ok(Self::new(Document::from_bytes(bytes)?, theme))
    }

    pub fn dispatch(&mut self, cmd: Cmd) -> Transaction {
        let transaction = self.document.apply(cmd);
        self.previews.update(&self.document, &transaction);
        transaction
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn previews(&self) -> &ImagePreviews {
        &self.previews
    }
}

impl DecorationSource for Editor {
    fn decorations(&self) -> &DecorationSet {
        self.previews.decorations()
    }
}
