pub type CmdResult<T> = retree::Result<(T, i32)>;

pub mod rewrite;
