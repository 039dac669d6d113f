use crate::topology;

pub fn handle() -> anyhow::Result<()> {
    let app = topology::build_app()?;
    for stack in app.stacks() {
        println!("{}", stack.stack_name);
    }
    Ok(())
}
