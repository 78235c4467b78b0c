// Tokenizer integration tests

mod test_compounds;
mod test_positions;
