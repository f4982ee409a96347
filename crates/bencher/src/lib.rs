//! Wire fixtures shared by the benchmarks.

/// Which decoder a fixture is meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixtureKind {
    Request,
    Response,
}

/// A captured HTTP message, head and body, stored with `\r\n` line endings.
#[derive(Debug, Copy, Clone)]
pub struct Fixture {
    name: &'static str,
    kind: FixtureKind,
    content: &'static [u8],
}

impl Fixture {
    pub const fn request(name: &'static str, content: &'static [u8]) -> Self {
        Self { name, kind: FixtureKind::Request, content }
    }

    pub const fn response(name: &'static str, content: &'static [u8]) -> Self {
        Self { name, kind: FixtureKind::Response, content }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FixtureKind {
        self.kind
    }

    pub fn content(&self) -> &'static [u8] {
        self.content
    }

    /// Size of the fixture, for criterion throughput reporting.
    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

pub static GET_SMALL: Fixture = Fixture::request("get_small", include_bytes!("../resources/request/get_small.txt"));
pub static GET_LARGE: Fixture = Fixture::request("get_large", include_bytes!("../resources/request/get_large.txt"));
pub static PLAYLIST_LENGTH: Fixture =
    Fixture::response("playlist_length", include_bytes!("../resources/response/playlist_length.txt"));
pub static PLAYLIST_CHUNKED: Fixture =
    Fixture::response("playlist_chunked", include_bytes!("../resources/response/playlist_chunked.txt"));

/// Every fixture of the given kind.
pub fn fixtures(kind: FixtureKind) -> Vec<Fixture> {
    [GET_SMALL, GET_LARGE, PLAYLIST_LENGTH, PLAYLIST_CHUNKED].into_iter().filter(|f| f.kind() == kind).collect()
}
