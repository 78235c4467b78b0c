// Expansion builder integration tests

mod test_families;
