// Re-export the mock device module
pub mod mock_device;
// Re-export the buffer pool tests
pub mod buffer_pool_test;
// Re-export the semaphore tests
pub mod semaphore_test;
// Re-export the settings tests
pub mod settings_test;
// Re-export the test helpers
pub mod test_helpers;
