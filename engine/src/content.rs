//====================================================================

use std::{
    error::Error,
    fmt::Display,
    path::{Component, Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
};

use rustc_hash::FxHashMap;

//====================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentRequest {
    pub generation: u64,
    pub sequence: u64,
    pub source: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContentResponse {
    pub generation: u64,
    pub sequence: u64,
    pub source: String,
    pub result: Result<String, ContentError>,
}

impl ContentResponse {
    #[inline]
    fn answer(request: ContentRequest, result: Result<String, ContentError>) -> Self {
        Self {
            generation: request.generation,
            sequence: request.sequence,
            source: request.source,
            result,
        }
    }
}

//====================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum ContentError {
    InvalidSource(String),
    NotFound(String),
    Io { source: String, reason: String },
    WorkerUnavailable,
}

impl Error for ContentError {}

impl Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentError::InvalidSource(source) => {
                write!(f, "Content source '{}' escapes the content root", source)
            }
            ContentError::NotFound(source) => write!(f, "Content '{}' not found", source),
            ContentError::Io { source, reason } => {
                write!(f, "Unable to read content '{}': {}", source, reason)
            }
            ContentError::WorkerUnavailable => write!(f, "Unable to start content worker"),
        }
    }
}

//====================================================================

/// Asynchronous fetching of markup fragments. `request` never blocks,
/// finished loads are collected through `poll`.
pub trait ContentLoader {
    fn request(&mut self, request: ContentRequest);
    fn poll(&mut self) -> Vec<ContentResponse>;
}

//====================================================================

/// Reads sources relative to a root directory on worker threads.
pub struct FileLoader {
    root: PathBuf,
    sender: Sender<ContentResponse>,
    receiver: Receiver<ContentResponse>,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (sender, receiver) = mpsc::channel();

        Self {
            root: root.into(),
            sender,
            receiver,
        }
    }

    fn resolve(&self, source: &str) -> Result<PathBuf, ContentError> {
        let relative = Path::new(source);

        match relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
        {
            true => Ok(self.root.join(relative)),
            false => Err(ContentError::InvalidSource(source.to_string())),
        }
    }
}

impl ContentLoader for FileLoader {
    fn request(&mut self, request: ContentRequest) {
        let path = match self.resolve(&request.source) {
            Ok(path) => path,
            Err(e) => {
                let _ = self.sender.send(ContentResponse::answer(request, Err(e)));
                return;
            }
        };

        log::debug!("Loading content from {:?}", path);

        let sender = self.sender.clone();
        let fallback = request.clone();

        let spawned = std::thread::Builder::new()
            .name("content-loader".into())
            .spawn(move || {
                let result = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => ContentError::NotFound(request.source.clone()),
                    _ => ContentError::Io {
                        source: request.source.clone(),
                        reason: e.to_string(),
                    },
                });

                // The loader may be gone by now, nobody is waiting on this anymore
                let _ = sender.send(ContentResponse::answer(request, result));
            });

        if let Err(e) = spawned {
            log::warn!("Failed to spawn content worker: {}", e);
            let _ = self.sender.send(ContentResponse::answer(
                fallback,
                Err(ContentError::WorkerUnavailable),
            ));
        }
    }

    #[inline]
    fn poll(&mut self) -> Vec<ContentResponse> {
        self.receiver.try_iter().collect()
    }
}

//====================================================================

/// Serves content from memory. Requests are answered on the following poll.
#[derive(Default)]
pub struct StaticLoader {
    pages: FxHashMap<String, String>,
    pending: Vec<ContentRequest>,
}

impl StaticLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_page(mut self, source: &str, markup: &str) -> Self {
        self.pages.insert(source.to_string(), markup.to_string());
        self
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl ContentLoader for StaticLoader {
    #[inline]
    fn request(&mut self, request: ContentRequest) {
        self.pending.push(request);
    }

    fn poll(&mut self) -> Vec<ContentResponse> {
        self.pending
            .drain(..)
            .map(|request| {
                let result = self
                    .pages
                    .get(&request.source)
                    .cloned()
                    .ok_or_else(|| ContentError::NotFound(request.source.clone()));

                ContentResponse::answer(request, result)
            })
            .collect()
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn request(sequence: u64, source: &str) -> ContentRequest {
        ContentRequest {
            generation: 1,
            sequence,
            source: source.into(),
        }
    }

    fn wait_for(loader: &mut FileLoader, count: usize) -> Vec<ContentResponse> {
        let mut responses = Vec::new();
        for _ in 0..200 {
            responses.extend(loader.poll());
            if responses.len() >= count {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        responses
    }

    #[test]
    fn static_loader_answers_on_next_poll() {
        let mut loader = StaticLoader::new().with_page("htmlLayouts/about.html", "<p>Hi</p>");

        loader.request(request(1, "htmlLayouts/about.html"));
        loader.request(request(2, "htmlLayouts/missing.html"));
        assert_eq!(loader.pending(), 2);

        let responses = loader.poll();
        assert_eq!(responses[0].result, Ok("<p>Hi</p>".to_string()));
        assert_eq!(
            responses[1].result,
            Err(ContentError::NotFound("htmlLayouts/missing.html".into()))
        );
        assert!(loader.poll().is_empty());
    }

    #[test]
    fn file_loader_reads_relative_to_root() {
        let root = std::env::temp_dir().join(format!("lavios-content-{}", std::process::id()));
        std::fs::create_dir_all(root.join("htmlLayouts")).unwrap();
        std::fs::write(root.join("htmlLayouts/about.html"), "<h1>About</h1>").unwrap();

        let mut loader = FileLoader::new(&root);
        loader.request(request(4, "htmlLayouts/about.html"));
        loader.request(request(5, "htmlLayouts/nothing.html"));

        let mut responses = wait_for(&mut loader, 2);
        responses.sort_by_key(|response| response.sequence);

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].result, Ok("<h1>About</h1>".to_string()));
        assert_eq!(
            responses[1].result,
            Err(ContentError::NotFound("htmlLayouts/nothing.html".into()))
        );

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn file_loader_rejects_escaping_sources() {
        let mut loader = FileLoader::new("assets");
        loader.request(request(1, "../secret.html"));

        let responses = wait_for(&mut loader, 1);
        assert_eq!(
            responses[0].result,
            Err(ContentError::InvalidSource("../secret.html".into()))
        );
    }
}

//====================================================================
