mod artifact_tests;
mod leaf_text_tests;
