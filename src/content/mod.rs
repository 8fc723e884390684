/// Domain managers over the shared store
pub mod dashboard;
pub mod likes;
pub mod models;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod videos;

#[cfg(test)]
pub(crate) mod testing;
