// Concrete providers behind the MediaProvider seam

pub mod ytdlp;

pub use ytdlp::YtDlpProvider;
