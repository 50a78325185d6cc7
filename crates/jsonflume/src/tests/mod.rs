mod arbitrary;
mod chunking;
mod parse_good;
