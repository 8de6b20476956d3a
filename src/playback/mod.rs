pub mod session;
pub mod sink;
pub mod source;

pub use session::{PlaybackSession, SessionEnd, SessionError};
pub use sink::{PlaybackSink, RodioSink, SinkError};
pub use source::{AudioSource, FileSource, FrameRead, SourceError};
