// Work queue integration tests

mod test_ordering;
