//! Watches ARC retune its recency/frequency split under a shifting workload.
//!
//! Run with: `cargo run --example arc_adaptation`

use hotset::concurrent::ConcurrentCache;
use hotset::policy::arc::ArcCore;

fn main() {
    let cache = ConcurrentCache::new(ArcCore::new(8));

    // Phase 1: a pure scan cycling twice the capacity keeps hitting B1
    // ghosts, arguing for more recency room: p climbs toward C.
    for i in 0..64u64 {
        cache.put(i % 16, i);
        if i % 8 == 7 {
            let (p, t1, t2, b1, b2) = cache.with_engine(|engine| {
                (
                    engine.p(),
                    engine.t1_len(),
                    engine.t2_len(),
                    engine.b1_len(),
                    engine.b2_len(),
                )
            });
            println!("scan    p={p} t1={t1} t2={t2} b1={b1} b2={b2}");
        }
    }

    // Phase 2: a small hot set re-referenced over and over builds up T2.
    for round in 0..32u64 {
        for key in 0..4u64 {
            cache.put(key, round);
            let _ = cache.get(&key);
        }
    }
    let (p, t1, t2) = cache.with_engine(|engine| (engine.p(), engine.t1_len(), engine.t2_len()));
    println!("hotset  p={p} t1={t1} t2={t2}");

    for key in 0..4u64 {
        println!("get({key}) = {:?}", cache.get(&key));
    }
}
