/// Image file handling
///
/// This module handles:
/// - Generating gallery thumbnails
/// - Caching thumbnails to disk

pub mod thumbnail;
