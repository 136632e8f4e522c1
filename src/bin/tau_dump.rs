//! Prints the compiled shader, uniform layout and box geometry of a sample
//! tree, rendered once through the headless backend.

use tau::backend::{GpuBackend, HeadlessBackend};
use tau::style::uniform_fields;
use tau::ui::collect_boxes;
use tau::{
    Block, Border, Color, Gradient, Leaf, Length, Quantity2D, RuntimeConfig, Style, UiRuntime,
    view,
};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("tau-dump: {err}");
        std::process::exit(1);
    }
}

fn run() -> tau::Result<()> {
    let config = RuntimeConfig::from_env()?;
    let style = Gradient::new(Color::RED, Color::BLUE) | Border::new(16.0, 4.0, Color::GREEN);

    let compiled = style.compile();
    println!("// {}", compiled.identity);
    print!("{}", compiled.fragment_source);
    println!();
    println!("uniform block: {} bytes", compiled.uniform_size);
    for field in uniform_fields(&style) {
        println!(
            "  {:>4}  {:<6} {}",
            field.offset,
            field.ty.glsl(),
            field.name
        );
    }

    let root = view(
        Block::new().padding(Quantity2D::uniform(24.px())),
        Style::Default,
    )
    .children(
        view(
            Block::new().dimensions(Quantity2D::both(100.percent(), 240.px())),
            style.clone(),
        ) | Leaf::text("caption")
            | view(
                Block::new().dimensions(Quantity2D::both(50.percent(), 120.px())),
                Gradient::new(Color::WHITE, Color::BLACK),
            ),
    );

    let backend = HeadlessBackend::new(config.frames_in_flight);
    let mut runtime = UiRuntime::new(backend, config)?;
    runtime.mount(root, (800, 600));
    runtime.render_frame()?;

    println!();
    if let Some(root) = runtime.root() {
        for node in collect_boxes(root) {
            println!(
                "{:indent$}#{} bounds {:?} content {:?}",
                "",
                node.id,
                node.bounds,
                node.content,
                indent = node.depth * 2
            );
        }
    }

    let backend = runtime.backend();
    println!();
    println!(
        "{} draws, {} pipelines, {} frames in flight",
        backend.draws().len(),
        backend.pipeline_count(),
        backend.frames_in_flight()
    );
    Ok(())
}
