mod common;

use anyhow::Result;
use plan_core::plan_digest;

#[test]
fn identical_inputs_compile_to_identical_plans() -> Result<()> {
    let compiler = common::fixed_compiler();
    let input = common::load_input("lis_multi_pre.json")?;

    let plan_a = compiler.generate_plan(&input);
    let plan_b = compiler.generate_plan(&input);

    assert_eq!(plan_a, plan_b);
    assert_eq!(
        serde_json::to_string(&plan_a)?,
        serde_json::to_string(&plan_b)?
    );
    Ok(())
}

#[test]
fn digest_ignores_generation_time() -> Result<()> {
    let input = common::load_input("bcn_nuk_post.json")?;
    let pinned = common::fixed_compiler().generate_plan(&input);
    let live = plan_core::generate_plan(&input);

    assert_ne!(pinned.meta.generated_at, live.meta.generated_at);
    assert_eq!(plan_digest(&pinned)?, plan_digest(&live)?);
    Ok(())
}

#[test]
fn digest_tracks_content_changes() -> Result<()> {
    let compiler = common::fixed_compiler();
    let input = common::load_input("bcn_nuk_post.json")?;
    let mut moved = input.clone();
    moved.start.lat += 0.01;

    let baseline = plan_digest(&compiler.generate_plan(&input))?;
    let shifted = plan_digest(&compiler.generate_plan(&moved))?;
    assert_ne!(baseline, shifted);
    Ok(())
}

#[test]
fn compiler_is_shareable_across_threads() -> Result<()> {
    let compiler = common::fixed_compiler();
    let input = common::load_input("lis_multi_pre.json")?;
    let expected = compiler.generate_plan(&input);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| compiler.generate_plan(&input)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("worker"), expected);
        }
    });
    Ok(())
}
