pub mod receipt_tests;
