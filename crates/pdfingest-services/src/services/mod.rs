pub mod extraction;
pub mod summarization;
pub mod tenant_lifecycle;
pub mod upload;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
