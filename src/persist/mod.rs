/// Reading and writing snippets as `.sql` files in a snippets directory.
pub mod files;
