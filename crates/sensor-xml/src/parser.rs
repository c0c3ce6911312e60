use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::cursor::XmlCursor;
use crate::error::{Result, XmlError};

/// Consumes one document through a cursor.
pub trait XmlStreamHandler {
    fn stream<R: BufRead>(&mut self, cursor: &mut XmlCursor<R>) -> Result<()>;
}

impl<H: XmlStreamHandler + ?Sized> XmlStreamHandler for &mut H {
    fn stream<R: BufRead>(&mut self, cursor: &mut XmlCursor<R>) -> Result<()> {
        (**self).stream(cursor)
    }
}

/// Feeds documents to a stream handler.
#[derive(Debug)]
pub struct StaxParser<H> {
    handler: H,
}

impl<H: XmlStreamHandler> StaxParser<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn parse_path(&mut self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "parsing xml document");
        let file = File::open(path).map_err(|source| XmlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_reader(BufReader::new(file))
    }

    pub fn parse_reader<R: BufRead>(&mut self, source: R) -> Result<()> {
        let mut cursor = XmlCursor::new(source);
        self.handler.stream(&mut cursor)?;
        cursor.finish()
    }

    pub fn parse_str(&mut self, text: &str) -> Result<()> {
        self.parse_reader(text.as_bytes())
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }
}
