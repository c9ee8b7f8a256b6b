//! Output bundle model handed to the plugin at bundle finalization.

/// A code chunk produced by the host build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    /// File name relative to the output directory.
    pub file_name: String,
    /// Emitted code.
    pub code: String,
    /// Whether this chunk is an application load entry point.
    pub is_entry: bool,
}

impl OutputChunk {
    /// Creates a chunk.
    pub fn new(file_name: impl Into<String>, code: impl Into<String>, is_entry: bool) -> Self {
        Self {
            file_name: file_name.into(),
            code: code.into(),
            is_entry,
        }
    }
}

/// A static text asset, either produced by the host or emitted by a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputAsset {
    /// File name relative to the output directory.
    pub file_name: String,
    /// Asset text.
    pub source: String,
}

impl OutputAsset {
    /// Creates an asset.
    pub fn new(file_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            source: source.into(),
        }
    }
}

/// One item of the output bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    /// Code chunk.
    Chunk(OutputChunk),
    /// Static asset.
    Asset(OutputAsset),
}

impl OutputItem {
    /// File name of the item.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Chunk(chunk) => &chunk.file_name,
            Self::Asset(asset) => &asset.file_name,
        }
    }
}

/// Ordered bundle contents. Items keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBundle {
    items: Vec<OutputItem>,
}

impl OutputBundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk.
    pub fn push_chunk(&mut self, chunk: OutputChunk) {
        self.items.push(OutputItem::Chunk(chunk));
    }

    /// Appends an asset.
    pub fn push_asset(&mut self, asset: OutputAsset) {
        self.items.push(OutputItem::Asset(asset));
    }

    /// All items in insertion order.
    pub fn items(&self) -> &[OutputItem] {
        &self.items
    }

    /// Chunks in insertion order.
    pub fn chunks(&self) -> impl Iterator<Item = &OutputChunk> {
        self.items.iter().filter_map(|item| match item {
            OutputItem::Chunk(chunk) => Some(chunk),
            OutputItem::Asset(_) => None,
        })
    }

    /// Assets in insertion order.
    pub fn assets(&self) -> impl Iterator<Item = &OutputAsset> {
        self.items.iter().filter_map(|item| match item {
            OutputItem::Asset(asset) => Some(asset),
            OutputItem::Chunk(_) => None,
        })
    }

    /// Looks up an item by file name.
    pub fn get(&self, file_name: &str) -> Option<&OutputItem> {
        self.items.iter().find(|item| item.file_name() == file_name)
    }

    /// First chunk flagged as an entry point.
    pub fn entry_chunk_mut(&mut self) -> Option<&mut OutputChunk> {
        self.items.iter_mut().find_map(|item| match item {
            OutputItem::Chunk(chunk) if chunk.is_entry => Some(chunk),
            _ => None,
        })
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the bundle holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
