use propstep::Prover;

fn main() {
    propstep::bin::cli(Prover::default())
}
