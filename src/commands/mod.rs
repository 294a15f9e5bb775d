pub type CmdResult<T> = fontpatch::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod apply;

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (fontpatch::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Apply(args) => {
            crate::output::map_cmd_result_to_json(apply::run(args, global))
        }
    }
}
