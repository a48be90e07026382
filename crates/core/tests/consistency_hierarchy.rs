//! Tests pinning down how the three models relate:
//!   CM => CC, CCv => CC, CM and CCv incomparable.
//!
//! Each boundary test builds a concrete history that passes one model and
//! fails another, documenting the exact separation.

mod common;

use c3_core::specification::Specification;
use c3_core::{check_cc, check_ccv, check_cm};
use common::{MemHistory, MemOp, MEM};

// -- Boundary 1: CC and CM pass, CCv fails ------------------------------------

/// Two processes each write x and then read the other's value.
///
/// p1: w(x,1) r(x,2)
/// p2: w(x,2) r(x,1)
///
/// CM: each read sees both writes, serialized with the other's write last.
/// CCv: one arbitration must order w(x,1) and w(x,2) both ways -- fail.
#[test]
fn boundary_memory_without_convergence() {
    let h = history! {
        "p1" => [w(x, 1), r(x, 2)],
        "p2" => [w(x, 2), r(x, 1)],
    };
    assert!(check_cc(&h, &MEM).is_cc());
    assert!(check_cm(&h, &MEM).is_cm());
    assert!(!check_ccv(&h, &MEM).is_ccv());
}

// -- Boundary 2: CC passes, CM and CCv fail -----------------------------------

/// A reader flips between two concurrent writes and back.
///
/// p1: w(x,1)
/// p2: w(x,2)
/// p3: r(x,1) r(x,2) r(x,1)
///
/// CC: each read picks its own serialization of w(x,1) and w(x,2).
/// CM: the last read must also explain 1, 2, 1 in one order -- fail.
/// CCv: the shared order fixes w(x,1) and w(x,2) once -- fail.
#[test]
fn boundary_consistency_without_memory() {
    let h = history! {
        "p1" => [w(x, 1)],
        "p2" => [w(x, 2)],
        "p3" => [r(x, 1), r(x, 2), r(x, 1)],
    };
    let cc = check_cc(&h, &MEM).into_witness().expect("causally consistent");
    assert!(!check_cm(&h, &MEM).is_cm());
    assert!(!check_ccv(&h, &MEM).is_ccv());

    // the focused read sees everything, but only its own outcome
    let log = &cc.serializations[&common::id("p3.3")];
    assert_eq!(log.len(), 5);
    assert_eq!(log.iter().filter(|op| op.is_operation()).count(), 1);
}

// -- Boundary 3: CCv passes, CM fails -----------------------------------------

/// p2 reads z as unwritten, then learns y=1, which p1 wrote after z and
/// after its own write of x.
///
/// p1: w(z,1) w(x,1) w(y,1)
/// p2: w(x,2) r(z) r(y,1) r(x,2)
///
/// CCv: arbitrate w(x,1) before w(x,2); each read only needs its own value.
/// CM: the last read must also explain r(z)=unwritten, which forces
/// w(x,2) < r(z) < w(z,1) < w(x,1) and so r(x)=1 -- fail.
#[test]
fn boundary_convergence_without_memory() {
    let h = history! {
        "p1" => [w(z, 1), w(x, 1), w(y, 1)],
        "p2" => [w(x, 2), r(z), r(y, 1), r(x, 2)],
    };
    assert!(check_cc(&h, &MEM).is_cc());
    assert!(check_ccv(&h, &MEM).is_ccv());
    assert!(!check_cm(&h, &MEM).is_cm());
}

// -- Monotonicity over small histories ----------------------------------------

const ALPHABET: usize = 5;

fn pick(i: usize) -> MemOp {
    match i {
        0 => op!(w(x, 1)),
        1 => op!(w(x, 2)),
        2 => op!(r(x, 1)),
        3 => op!(r(x, 2)),
        _ => op!(r(x)),
    }
}

/// Every history with up to two operations in p1 and up to one in p2.
fn small_histories() -> Vec<MemHistory> {
    let mut sequences: Vec<Vec<usize>> = vec![vec![]];
    for a in 0..ALPHABET {
        sequences.push(vec![a]);
        for b in 0..ALPHABET {
            sequences.push(vec![a, b]);
        }
    }

    let mut histories = Vec::new();
    for p1 in &sequences {
        for p2 in sequences.iter().filter(|s| s.len() <= 1) {
            histories.push(MemHistory::new([
                ("p1", p1.iter().copied().map(pick).collect()),
                ("p2", p2.iter().copied().map(pick).collect()),
            ]));
        }
    }
    histories
}

#[test]
fn stronger_models_imply_causal_consistency() {
    let histories = small_histories();
    assert_eq!(histories.len(), 31 * 6);

    for h in &histories {
        let cc = check_cc(h, &MEM).is_cc();
        if check_cm(h, &MEM).is_cm() {
            assert!(cc, "CM without CC: {:?}", h.labels());
        }
        if check_ccv(h, &MEM).is_ccv() {
            assert!(cc, "CCv without CC: {:?}", h.labels());
        }
    }
}

#[test]
fn memory_witness_logs_justify_their_own_outcome() {
    for h in &small_histories() {
        let Some(witness) = check_cm(h, &MEM).into_witness() else {
            continue;
        };
        for (op_id, log) in &witness.serializations {
            assert!(MEM.satisfies(log), "{op_id}: {log:?}");

            // hiding every outcome but the focus keeps the log acceptable
            let own_only: Vec<_> = log
                .iter()
                .map(|op| {
                    if op.op_id() == Some(op_id) {
                        op.clone()
                    } else {
                        op.to_instruction()
                    }
                })
                .collect();
            assert!(MEM.satisfies(&own_only), "{op_id}: {own_only:?}");
        }
    }
}
