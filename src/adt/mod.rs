/*!

Fixed-capacity containers used by the translators and dispatchers. Every container in this module
has a compile-time capacity and performs no allocation after construction.

!*/

pub mod fifo;
pub mod iumap;
pub mod lru;
pub mod plru;

pub use fifo::Fifo;
pub use iumap::Iumap;
pub use lru::LruList;
pub use plru::PlruCache;
